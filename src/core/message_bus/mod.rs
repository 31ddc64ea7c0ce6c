//=========================================================================
// Frame Message Bus
//=========================================================================
//
// Typed, type-erased message queues carried on the frame context.
//
// Architecture:
//   Component::update() → FrameContext::post<M>() → queue for M
//                                                      ↓
//   Later components / coordinator ← read<M>() / drain<M>()
//                                                      ↓
//   Scene ─────────────→ clear_all() at the start of the next frame
//
//=========================================================================

//=== Module Declarations =================================================

mod bus;
mod message_queue;

//=== Public API ==========================================================

pub use bus::{Message, MessageBus};
