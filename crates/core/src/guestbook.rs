//! Guestbook rules: entry validation, reply threading and like toggling.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum guest name length (characters).
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum message length (characters).
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Depth at which the reply action is no longer offered, and the deepest
/// level threads are nested to. Roots are depth 0.
pub const MAX_REPLY_DEPTH: usize = 3;

/// Whether an entry displayed at `depth` may be replied to.
pub fn can_reply_at(depth: usize) -> bool {
    depth < MAX_REPLY_DEPTH
}

/// Validate a new entry's name and message, returning the trimmed values.
pub fn validate_entry(name: &str, message: &str) -> Result<(String, String), CoreError> {
    let name = name.trim();
    let message = message.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Name is required".into()));
    }
    if message.is_empty() {
        return Err(CoreError::Validation("Message is required".into()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Name exceeds maximum length of {MAX_NAME_LENGTH} characters"
        )));
    }
    if message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Message exceeds maximum length of {MAX_MESSAGE_LENGTH} characters"
        )));
    }
    Ok((name.to_string(), message.to_string()))
}

// ---------------------------------------------------------------------------
// Threading
// ---------------------------------------------------------------------------

/// A record that may point at a parent record by id.
pub trait Threaded {
    fn id(&self) -> DbId;
    fn parent_id(&self) -> Option<DbId>;
}

/// An entry with its direct replies, recursively.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thread<T> {
    #[serde(flatten)]
    pub entry: T,
    pub replies: Vec<Thread<T>>,
}

impl<T> Thread<T> {
    /// Number of entries in this thread including the root.
    pub fn len(&self) -> usize {
        1 + self.replies.iter().map(Thread::len).sum::<usize>()
    }

    /// Always false; a thread holds at least its root entry.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Depth of the deepest entry, where the root is 1.
    pub fn depth(&self) -> usize {
        1 + self.replies.iter().map(Thread::depth).max().unwrap_or(0)
    }
}

/// Rebuild reply threads from a flat list.
///
/// Replies keep their input order under each parent. Entries whose parent is
/// missing from the input, or that point at themselves, become roots. Entries
/// caught in a parent cycle are broken out by promoting the first member of
/// the cycle (in input order) to a root. Every input entry appears exactly
/// once in the result.
///
/// Nesting stops at [`MAX_REPLY_DEPTH`]: a reply to an entry already at that
/// depth is listed beside it, after the entries before it in reading order.
/// Storage allows chains of any length, so the output depth stays bounded.
pub fn build_threads<T: Threaded>(entries: Vec<T>) -> Vec<Thread<T>> {
    let index: HashMap<DbId, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.id(), i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); entries.len()];
    let mut roots: Vec<usize> = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        match entry.parent_id().and_then(|p| index.get(&p).copied()) {
            Some(parent) if parent != i => children[parent].push(i),
            _ => roots.push(i),
        }
    }

    // Anything not reachable from a root sits on a cycle (or hangs off one).
    let mut reached = vec![false; entries.len()];
    for &root in &roots {
        mark_reached(root, &children, &mut reached);
    }
    for i in 0..entries.len() {
        if !reached[i] {
            detach(i, &entries, &index, &mut children);
            roots.push(i);
            mark_reached(i, &children, &mut reached);
        }
    }
    roots.sort_unstable();

    let (order, shown_under) = display_layout(&roots, &children);

    // Children come after their parent in `order`, so walking it backwards
    // builds every reply before the entry that holds it.
    let mut slots: Vec<Option<T>> = entries.into_iter().map(Some).collect();
    let mut built: Vec<Option<Thread<T>>> = (0..slots.len()).map(|_| None).collect();
    for &i in order.iter().rev() {
        let Some(entry) = slots[i].take() else {
            continue;
        };
        let replies = shown_under[i]
            .iter()
            .filter_map(|&c| built[c].take())
            .collect();
        built[i] = Some(Thread { entry, replies });
    }

    roots.into_iter().filter_map(|root| built[root].take()).collect()
}

fn mark_reached(start: usize, children: &[Vec<usize>], reached: &mut [bool]) {
    let mut stack = vec![start];
    while let Some(i) = stack.pop() {
        if !reached[i] {
            reached[i] = true;
            stack.extend(children[i].iter().copied());
        }
    }
}

/// Remove `i` from its parent's child list.
fn detach<T: Threaded>(
    i: usize,
    entries: &[T],
    index: &HashMap<DbId, usize>,
    children: &mut [Vec<usize>],
) {
    if let Some(&parent) = entries[i].parent_id().and_then(|p| index.get(&p)) {
        children[parent].retain(|&c| c != i);
    }
}

/// Pre-order of every entry reachable from `roots`, and for each entry the
/// replies displayed directly under it once nesting is capped.
fn display_layout(roots: &[usize], children: &[Vec<usize>]) -> (Vec<usize>, Vec<Vec<usize>>) {
    let mut order = Vec::with_capacity(children.len());
    let mut shown_under: Vec<Vec<usize>> = vec![Vec::new(); children.len()];
    let mut visited = vec![false; children.len()];

    // (entry, entry it is displayed under, display depth)
    let mut stack: Vec<(usize, Option<usize>, usize)> =
        roots.iter().rev().map(|&r| (r, None, 0)).collect();
    while let Some((i, holder, depth)) = stack.pop() {
        if std::mem::replace(&mut visited[i], true) {
            continue;
        }
        order.push(i);
        if let Some(holder) = holder {
            shown_under[holder].push(i);
        }

        let (child_holder, child_depth) = if depth < MAX_REPLY_DEPTH {
            (Some(i), depth + 1)
        } else {
            (holder, depth)
        };
        stack.extend(
            children[i]
                .iter()
                .rev()
                .map(|&c| (c, child_holder, child_depth)),
        );
    }
    (order, shown_under)
}

// ---------------------------------------------------------------------------
// Likes
// ---------------------------------------------------------------------------

/// Whether a session currently likes an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LikeState {
    Liked,
    NotLiked,
}

impl LikeState {
    pub fn from_liked(liked: bool) -> Self {
        if liked {
            LikeState::Liked
        } else {
            LikeState::NotLiked
        }
    }

    pub fn is_liked(self) -> bool {
        matches!(self, LikeState::Liked)
    }

    pub fn toggled(self) -> Self {
        match self {
            LikeState::Liked => LikeState::NotLiked,
            LikeState::NotLiked => LikeState::Liked,
        }
    }

    /// Apply the count change for moving into this state.
    pub fn apply_to_count(self, likes_count: i32) -> i32 {
        match self {
            LikeState::Liked => likes_count.saturating_add(1),
            LikeState::NotLiked => (likes_count - 1).max(0),
        }
    }
}
