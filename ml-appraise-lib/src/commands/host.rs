use std::io::Write;

/// The process around a command: where output goes and how it ends.
pub trait Host: Send + Sync {
    /// Destination for rows and reports (stdout for a real process)
    fn output(&mut self) -> impl Write;

    /// Destination for user-facing error messages (stderr for a real process)
    fn error(&mut self) -> impl Write;

    /// Terminate with `code`. Test hosts record the code and return.
    fn exit(&mut self, code: i32);
}

/// Host capturing everything in memory
#[cfg(test)]
#[derive(Debug, Default)]
pub struct TestHost {
    pub output_buf: Vec<u8>,
    pub error_buf: Vec<u8>,
    pub exit_code: Option<i32>,
}

#[cfg(test)]
impl TestHost {
    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }

    pub fn error_text(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).into_owned()
    }
}

#[cfg(test)]
impl Host for TestHost {
    fn output(&mut self) -> impl Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl Write {
        &mut self.error_buf
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}
