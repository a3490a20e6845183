//! Carry-over line framing.
//!
//! A read from the socket may end anywhere: mid-line, mid-field, even
//! mid-terminator. `LineBuffer` accumulates chunks and yields only
//! lines whose terminator has been observed; the trailing partial line
//! is retained as the carry-over for the next read.

/// Accumulates byte-stream chunks and splits off complete lines.
///
/// A line is complete once its `\n` has arrived; a preceding `\r` is
/// stripped, so CRLF and bare LF frame identically.
#[derive(Debug, Default)]
pub struct LineBuffer {
    carry: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line completed by it, in arrival
    /// order. The trailing partial line (no terminator yet) becomes the
    /// new carry-over.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.carry.push_str(chunk);

        let mut lines = Vec::new();
        while let Some(idx) = self.carry.find('\n') {
            let rest = self.carry.split_off(idx + 1);
            let mut line = std::mem::replace(&mut self.carry, rest);
            line.truncate(idx);
            if line.ends_with('\r') {
                line.pop();
            }
            lines.push(line);
        }
        lines
    }

    /// Bytes received but not yet forming a complete line.
    pub fn carry(&self) -> &str {
        &self.carry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_lines_split() {
        let mut buf = LineBuffer::new();
        let lines = buf.push("S,STATS,x\r\nS,CURRENT,y\r\n");
        assert_eq!(lines, vec!["S,STATS,x", "S,CURRENT,y"]);
        assert_eq!(buf.carry(), "");
    }

    #[test]
    fn test_partial_line_retained() {
        let mut buf = LineBuffer::new();
        assert!(buf.push("Q,MSFT,NS").is_empty());
        assert_eq!(buf.carry(), "Q,MSFT,NS");

        let lines = buf.push("DQ,1.5\r\nQ,IB");
        assert_eq!(lines, vec!["Q,MSFT,NSDQ,1.5"]);
        assert_eq!(buf.carry(), "Q,IB");
    }

    #[test]
    fn test_crlf_split_across_chunks() {
        let mut buf = LineBuffer::new();
        assert!(buf.push("hello\r").is_empty());
        let lines = buf.push("\nworld\n");
        assert_eq!(lines, vec!["hello", "world"]);
    }

    #[test]
    fn test_bare_lf_accepted() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.push("a\nb\n"), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_lines_preserved() {
        let mut buf = LineBuffer::new();
        assert_eq!(buf.push("\r\nx\r\n"), vec!["", "x"]);
    }
}
