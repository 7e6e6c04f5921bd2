pub mod ring_buffer;
pub mod sample_format;
pub mod sample_window;
