//! # TUI Components
//!
//! All widgets of the terminal chat panel.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Built fresh each frame from the data they draw:
//! - `TitleBar`: Assistant name, phase, status line
//! - `Message`: One conversation message with its copy label
//! - `QuickQuestions`: Preset question bubbles
//! - `LandingPage`: Shown while the widget is closed
//!
//! ### Stateful Components (Event-Driven)
//!
//! Keep presentation state between frames and react to events:
//! - `InputBox`: Multi-line composer that grows with its content
//! - `MessageList`: Scrollable conversation view with layout caching
//!
//! ## Props-Based Data Flow
//!
//! Components receive what they draw as fields, never by reaching into the
//! core `App`. That keeps each one testable against a `TestBackend` with
//! hand-built props.
//!
//! ```text
//! components/
//! ├── mod.rs              (this file)
//! ├── title_bar.rs        (Top status bar)
//! ├── message.rs          (Single message renderer)
//! ├── message_list.rs     (Scrollable message container)
//! ├── quick_questions.rs  (Preset question bubbles)
//! ├── input_box/         (Composer and its row wrapping)
//! └── landing.rs          (Closed-widget screen)
//! ```

pub mod input_box;
pub mod landing;
pub mod message;
pub mod message_list;
pub mod quick_questions;
pub mod title_bar;

pub use input_box::{InputBox, InputEvent, MIN_INPUT_HEIGHT};
pub use landing::LandingPage;
pub use message::Message;
pub use message_list::{MessageList, MessageListState};
pub use quick_questions::QuickQuestions;
pub use title_bar::TitleBar;
