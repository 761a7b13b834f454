//! Statement blocks for a single object and their assembly into text

/// Everything emitted for one object, grouped by block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockSet {
    /// CREATE/ALTER statements, one per line
    pub primary: Vec<String>,
    pub comment: Option<String>,
    pub owner: Option<String>,
    pub privileges: Vec<String>,
}

impl BlockSet {
    pub fn new(primary: Vec<String>) -> Self {
        Self {
            primary,
            ..Self::default()
        }
    }

    /// A block set holding only privilege statements
    pub fn privileges_only(privileges: Vec<String>) -> Self {
        Self {
            privileges,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
            && self.comment.is_none()
            && self.owner.is_none()
            && self.privileges.is_empty()
    }

    /// Join the blocks with exactly one blank line between present blocks.
    ///
    /// The result has no leading or trailing newline.
    pub fn assemble(&self) -> String {
        let mut blocks: Vec<String> = Vec::with_capacity(4);

        if !self.primary.is_empty() {
            blocks.push(self.primary.join("\n"));
        }
        if let Some(comment) = &self.comment {
            blocks.push(comment.clone());
        }
        if let Some(owner) = &self.owner {
            blocks.push(owner.clone());
        }
        if !self.privileges.is_empty() {
            blocks.push(self.privileges.join("\n"));
        }

        blocks.join("\n\n")
    }
}

/// Join assembled objects with one blank line between them and a final newline
pub fn join_objects<I>(objects: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut out = objects
        .into_iter()
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
