#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    Submit,
    Reset,
    NextFocus,
    PrevFocus,
}
