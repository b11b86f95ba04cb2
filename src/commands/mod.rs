pub mod get;
pub mod normalize;
pub mod show;
