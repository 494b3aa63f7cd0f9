mod auto_screen_time;
mod screen_time;
mod streaks;
