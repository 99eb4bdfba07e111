//! Prompt relay. Shows a line of text in the host's default dialog.

use crate::host::{Dialog, HostError, HostSurface};

/// Forward `text` unmodified to the host dialog with default options.
///
/// The button the user pressed is not reported; a cancel comes back as
/// [`HostError::Cancelled`].
pub fn display(host: &mut dyn HostSurface, text: &str) -> Result<(), HostError> {
    host.display_dialog(&Dialog::new(text))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{DialogReply, MockHostSurface};

    #[test]
    fn forwards_text_with_default_options() {
        let mut host = MockHostSurface::new();
        host.expect_display_dialog()
            .withf(|d| *d == Dialog::new("  report.txt\n"))
            .times(1)
            .returning(|_| {
                Ok(DialogReply {
                    button_returned: "OK".into(),
                    text_returned: None,
                })
            });

        display(&mut host, "  report.txt\n").unwrap();
    }

    #[test]
    fn cancel_propagates() {
        let mut host = MockHostSurface::new();
        host.expect_display_dialog()
            .returning(|_| Err(HostError::Cancelled));

        let err = display(&mut host, "hi").unwrap_err();
        assert!(err.is_cancelled());
    }
}
