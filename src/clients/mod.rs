pub mod claude;
pub mod flexible;
pub mod mock;
pub mod xai;

pub use claude::{ClaudeClient, ClaudeConfig, ClaudeModel};
pub use flexible::{ClientType, FlexibleClient};
pub use mock::{MockClient, MockHandle, MockResponse, MockVoid};
pub use xai::{XaiClient, XaiConfig, XaiModel};
