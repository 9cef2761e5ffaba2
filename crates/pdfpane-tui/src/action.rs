/// User-level actions, mapped from raw terminal events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveDown,
    MoveUp,
    PageDown,
    PageUp,
    GoTop,
    GoBottom,
    /// Enter: open directory or submit the file under the cursor.
    DrillIn,
    /// Esc: leave the picker / dismiss.
    NavigateBack,
    /// Switch between split and text-only views.
    ToggleTab,
    /// "Upload new file": reset the session and return to the picker.
    NewUpload,
    Tick,
    Resize(u16, u16),
    None,
}
