pub mod catalog;
pub mod core;
pub mod loading;
pub mod registry;
pub mod render;
pub mod scope;
pub mod systems;

#[cfg(test)]
pub mod test_support;
