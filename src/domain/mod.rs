pub mod collector;
pub mod locale;
pub mod properties;
pub mod proxy;
