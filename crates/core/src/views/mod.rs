pub mod scroll_track;
