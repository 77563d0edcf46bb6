//! Serial link contract. Inbound text arrives as raw byte chunks that the
//! console line-buffers; outbound text is written as-is.

pub trait SerialPort: Send {
    fn write_text(&mut self, text: &str) -> std::io::Result<()>;
}
