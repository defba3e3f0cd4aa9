/// Longest fragment of template text quoted in a diagnostic.
pub const MAX_FRAGMENT_CHARS: usize = 1000;

/// Shortens a fragment of template text for display.
///
/// # Example
/// ```
/// use stencil::template::diagnostics::truncate_fragment;
///
/// assert_eq!(truncate_fragment("short"), "short");
/// assert_eq!(truncate_fragment(&"x".repeat(1500)).chars().count(), 1003);
/// ```
#[must_use]
pub fn truncate_fragment(text: &str) -> String {
    match text.char_indices().nth(MAX_FRAGMENT_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Who a trace frame belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOrigin {
    /// A template unit or a function written in a template.
    Template,
    /// A builtin function of the interpreter.
    Builtin,
}

/// One entry of the call trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceFrame {
    /// Function name, or `<unit>` for a unit's top level.
    pub function: String,
    /// File the running code comes from.
    pub file:     String,
    /// The line currently executing in this frame.
    pub line:     usize,
    /// Whether the frame is user code.
    pub origin:   FrameOrigin,
}

/// Live record of the frames that are running.
///
/// Every unit and call enters a frame and leaves it on every exit path. When
/// an error unwinds, the first frame to leave with an error snapshots the
/// whole stack, so the traceback shows where the error was raised rather
/// than where it was caught.
#[derive(Debug, Default)]
pub struct CallTrace {
    frames:  Vec<TraceFrame>,
    unwound: Option<Vec<TraceFrame>>,
}

impl CallTrace {
    /// Enters a frame of template code.
    pub fn enter(&mut self, function: &str, file: &str, line: usize) {
        self.frames.push(TraceFrame { function: function.to_string(),
                                      file:     file.to_string(),
                                      line,
                                      origin:   FrameOrigin::Template, });
    }

    /// Enters a frame of a builtin function.
    pub fn enter_builtin(&mut self, function: &str) {
        self.frames.push(TraceFrame { function: function.to_string(),
                                      file:     String::new(),
                                      line:     0,
                                      origin:   FrameOrigin::Builtin, });
    }

    /// Records the line the innermost frame is executing.
    pub fn mark(&mut self, line: usize) {
        if let Some(frame) = self.frames.last_mut() {
            frame.line = line;
        }
    }

    /// Leaves the innermost frame.
    ///
    /// `error_line` is the line of the error the frame is left with, if any.
    pub fn leave(&mut self, error_line: Option<usize>) {
        if let Some(line) = error_line
           && self.unwound.is_none()
        {
            self.mark(line);
            self.unwound = Some(self.frames.clone());
        }
        self.frames.pop();
    }

    /// Returns the traceback of the last error and forgets it.
    pub fn take(&mut self) -> Traceback {
        Traceback::new(self.unwound.take().unwrap_or_default())
    }

    /// Forgets all frames and any recorded traceback.
    pub fn reset(&mut self) {
        self.frames.clear();
        self.unwound = None;
    }

    /// Number of frames currently running.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

/// The template frames an error unwound through, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Traceback {
    frames: Vec<TraceFrame>,
}

impl Traceback {
    /// Builds a traceback, dropping frames that do not belong to templates.
    #[must_use]
    pub fn new(frames: Vec<TraceFrame>) -> Self {
        Self { frames: frames.into_iter()
                             .filter(|frame| frame.origin == FrameOrigin::Template)
                             .collect() }
    }

    /// The template frames, outermost first.
    #[must_use]
    pub fn frames(&self) -> &[TraceFrame] {
        &self.frames
    }

    /// Returns `true` if no template frame was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl std::fmt::Display for Traceback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }

        writeln!(f, "Traceback (most recent call last):")?;
        for frame in &self.frames {
            writeln!(f, "  File \"{}\", line {}, in {}", frame.file, frame.line, frame.function)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_taken_at_the_innermost_error() {
        let mut trace = CallTrace::default();
        trace.enter("<unit>", "main.tmpl", 0);
        trace.mark(7);
        trace.enter("render", "main.tmpl", 3);
        trace.mark(4);
        trace.enter_builtin("assert");

        trace.leave(Some(4));
        trace.leave(Some(4));
        trace.leave(Some(4));

        let traceback = trace.take();
        let lines = traceback.frames()
                             .iter()
                             .map(|frame| (frame.function.as_str(), frame.line))
                             .collect::<Vec<_>>();

        assert_eq!(lines, vec![("<unit>", 7), ("render", 4)]);
        assert_eq!(trace.depth(), 0);
    }

    #[test]
    fn successful_calls_leave_no_traceback() {
        let mut trace = CallTrace::default();
        trace.enter("f", "a.tmpl", 1);
        trace.leave(None);

        assert!(trace.take().is_empty());
    }

    #[test]
    fn display_lists_frames_outermost_first() {
        let traceback = Traceback::new(vec![TraceFrame { function: "render".to_string(),
                                                         file:     "t.tmpl".to_string(),
                                                         line:     2,
                                                         origin:   FrameOrigin::Template, },
                                            TraceFrame { function: "len".to_string(),
                                                         file:     String::new(),
                                                         line:     0,
                                                         origin:   FrameOrigin::Builtin, }]);

        assert_eq!(traceback.to_string(),
                   "Traceback (most recent call last):\n  File \"t.tmpl\", line 2, in render\n");
        assert_eq!(Traceback::default().to_string(), "");
    }
}
