//! # Events Module
//!
//! Event-driven reporting from the review workflow to any front end.
//!
//! ## Design
//! The workflow emits events through a channel, so a terminal UI, GUI
//! or test can subscribe without the workflow knowing which.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         match event {
//!             Event::Scan(ScanEvent::Progress(p)) => println!("{} {:?}%", p.title, p.percent),
//!             Event::Workflow(WorkflowEvent::Error { message }) => eprintln!("{message}"),
//!             _ => {}
//!         }
//!     }
//! });
//!
//! let mut workflow = Workflow::new(config, backend, push, sender);
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
