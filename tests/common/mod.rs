pub mod fake_transport;
pub mod fixtures;
pub mod http;
pub mod mock_lodestone;
