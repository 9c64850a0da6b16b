pub mod fetch_open_slots;
