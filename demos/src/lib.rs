pub mod app_setup_options;
pub mod character_animating_systems;
pub mod level_mechanics;
pub mod levels_setup;
