pub mod codec;
pub mod export;
pub mod fill;
pub mod filter;
pub mod grid;
pub mod locale;
pub mod session;
pub mod translate;
pub mod view;
