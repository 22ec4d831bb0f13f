/// The terminal surface the controller draws on.
///
/// Writes are raw terminal text: escape sequences are passed through and
/// line breaks must already be `\r\n`. Input does not flow through this
/// trait; the host delivers it to [`crate::Controller::handle_input`].
pub trait Display {
    fn write(&mut self, text: &str);
    /// Clear the visible screen and home the cursor.
    fn clear(&mut self);
    fn columns(&self) -> usize;
}
