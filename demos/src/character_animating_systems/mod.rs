pub mod strafe_animating_systems;
