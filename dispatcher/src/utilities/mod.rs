pub mod building;
pub mod cabin_status;
pub mod command;
pub mod itinerary;
pub mod status_board;
pub mod wait_list;
