//=========================================================================
// Platform Glue
//=========================================================================
//
// Connects winit windows to the kit's input components.
//
// Architecture:
// ```text
//  Host (owns the winit event loop)
//  ┌──────────────────────────────┐
//  │  ApplicationHandler          │
//  │   └─ window_event()          │
//  │        ↓                     │
//  │  WinitInputBridge            │        Scene
//  │   ├─ converts winit types    │   ┌────────────────────────┐
//  │   └─ tracks modifiers,       │   │ PointerEventComponent  │
//  │      cursor, held buttons    │   │ KeyboardEventComponent │
//  │        ↓                     │   └────────────────────────┘
//  │  InputSender ────────────────┼──────────↑ drained each frame
//  └──────────────────────────────┘
// ```
//
// The event loop, window creation and rendering stay with the host.
//
//=========================================================================

//=== Module Declarations =================================================

mod bridge;
mod conversions;

//=== Public API ==========================================================

pub use bridge::WinitInputBridge;
