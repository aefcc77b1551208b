mod controls;
mod hud;
