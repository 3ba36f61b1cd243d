pub mod events_table;
pub mod field;
pub mod game_list;
pub mod stat_table;
pub mod strike_zone;
pub mod velocity;
pub mod win_probability;
