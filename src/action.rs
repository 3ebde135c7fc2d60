#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    GrowLimit,
    ShrinkLimit,
    TogglePause,
    Refresh,
    None,
}
