/// Branch names an issue can map to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueBranch {
    /// `issue/<n>-<slug of first words>`, used for new worktrees.
    pub primary: String,
    /// `issue/<n>-<slug of full title>` when it differs from `primary`.
    /// Worktrees created before titles were truncated still use this form.
    pub legacy: Option<String>,
}
