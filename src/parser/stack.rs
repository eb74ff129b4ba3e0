use crate::error::ScriptError;

/// Deepest indent level the stack will hand out. Python refuses to compile
/// anything nested further.
pub const MAX_INDENT_LEVEL: usize = 100;

#[derive(Debug, Clone, Copy)]
struct Frame {
    level: usize,
    opened_at: usize,
}

/// Indent levels of the blocks currently open. Starts at `[0]`; the bottom
/// entry is never popped.
#[derive(Debug)]
pub struct IndentStack {
    frames: Vec<Frame>,
}

impl Default for IndentStack {
    fn default() -> Self {
        Self::new()
    }
}

impl IndentStack {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame {
                level: 0,
                opened_at: 0,
            }],
        }
    }

    pub fn top(&self) -> usize {
        self.frames.last().map_or(0, |f| f.level)
    }

    /// Number of open blocks.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    /// Open a block `step` levels deeper than the current one.
    pub fn push(&mut self, step: usize, offset: usize) -> Result<usize, ScriptError> {
        let level = self.top() + step;
        if level > MAX_INDENT_LEVEL {
            return Err(ScriptError::NestingTooDeep {
                offset,
                max: MAX_INDENT_LEVEL,
            });
        }
        self.frames.push(Frame {
            level,
            opened_at: offset,
        });
        Ok(level)
    }

    pub fn pop(&mut self, offset: usize) -> Result<usize, ScriptError> {
        if self.frames.len() <= 1 {
            return Err(ScriptError::UnbalancedBrace { offset });
        }
        self.frames.pop();
        Ok(self.top())
    }

    /// Succeeds only when every opened block has been closed.
    pub fn finish(&self) -> Result<(), ScriptError> {
        match self.frames.get(1) {
            Some(unclosed) => Err(ScriptError::UnclosedBrace {
                offset: unclosed.opened_at,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop() {
        let mut stack = IndentStack::new();
        assert_eq!(stack.push(1, 0).unwrap(), 1);
        assert_eq!(stack.push(2, 5).unwrap(), 3);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop(9).unwrap(), 1);
        assert_eq!(stack.pop(10).unwrap(), 0);
        assert!(stack.finish().is_ok());
    }

    #[test]
    fn test_underflow() {
        let mut stack = IndentStack::new();
        assert_eq!(
            stack.pop(4),
            Err(ScriptError::UnbalancedBrace { offset: 4 })
        );
        assert_eq!(stack.top(), 0);
    }

    #[test]
    fn test_unclosed_reports_outermost() {
        let mut stack = IndentStack::new();
        stack.push(1, 3).unwrap();
        stack.push(1, 7).unwrap();
        assert_eq!(
            stack.finish(),
            Err(ScriptError::UnclosedBrace { offset: 3 })
        );
    }

    #[test]
    fn test_nesting_cap() {
        let mut stack = IndentStack::new();
        for i in 0..MAX_INDENT_LEVEL {
            stack.push(1, i).unwrap();
        }
        assert!(matches!(
            stack.push(1, 999),
            Err(ScriptError::NestingTooDeep { offset: 999, .. })
        ));
    }
}
