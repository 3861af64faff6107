//! The blogs an agent follows and the posts it has read.

use std::collections::{BTreeMap, BTreeSet};

use echo_types::BlogId;
use serde::{Deserialize, Serialize};

use crate::blog::BlogRegistry;

/// Followed blogs in subscription order, plus read markers per blog.
///
/// A blog appears at most once. Read markers survive an unsubscribe, so a
/// blog followed again later does not serve old posts twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionSet {
    followed: Vec<BlogId>,
    read: BTreeMap<BlogId, BTreeSet<usize>>,
}

impl SubscriptionSet {
    /// Create an empty set.
    pub const fn new() -> Self {
        Self {
            followed: Vec::new(),
            read: BTreeMap::new(),
        }
    }

    /// Number of followed blogs.
    pub fn len(&self) -> usize {
        self.followed.len()
    }

    /// Whether no blog is followed.
    pub fn is_empty(&self) -> bool {
        self.followed.is_empty()
    }

    /// Whether `blog` is followed.
    pub fn contains(&self, blog: BlogId) -> bool {
        self.followed.contains(&blog)
    }

    /// Followed blogs in subscription order.
    pub fn iter(&self) -> impl Iterator<Item = BlogId> + '_ {
        self.followed.iter().copied()
    }

    /// Follow `blog`. Returns `false` if it was already followed.
    pub fn subscribe(&mut self, blog: BlogId) -> bool {
        if self.contains(blog) {
            return false;
        }
        self.followed.push(blog);
        true
    }

    /// Stop following `blog`. Returns `false` if it was not followed.
    pub fn unsubscribe(&mut self, blog: BlogId) -> bool {
        let before = self.followed.len();
        self.followed.retain(|b| *b != blog);
        self.followed.len() != before
    }

    /// Whether post `post` of `blog` has been read.
    pub fn has_read(&self, blog: BlogId, post: usize) -> bool {
        self.read.get(&blog).is_some_and(|posts| posts.contains(&post))
    }

    /// Mark a post read. Returns `false` if it already was.
    pub fn mark_read(&mut self, blog: BlogId, post: usize) -> bool {
        self.read.entry(blog).or_default().insert(post)
    }

    /// Find the first unread post and mark it read.
    ///
    /// Blogs are scanned in subscription order, posts oldest first.
    pub fn next_unread(&mut self, registry: &BlogRegistry) -> Option<(BlogId, usize)> {
        let found = self.followed.iter().find_map(|&blog| {
            let posts = registry.get(blog)?.posts().len();
            (0..posts)
                .find(|&post| !self.has_read(blog, post))
                .map(|post| (blog, post))
        })?;
        self.mark_read(found.0, found.1);
        Some(found)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use echo_types::{AgentId, CulturalState, FeatureVector};

    fn state(v: u32) -> CulturalState {
        CulturalState::Features(FeatureVector::new(vec![v]).unwrap())
    }

    #[test]
    fn subscribe_is_idempotent() {
        let mut subs = SubscriptionSet::new();
        assert!(subs.subscribe(BlogId::new(1)));
        assert!(!subs.subscribe(BlogId::new(1)));
        assert_eq!(subs.len(), 1);
        assert!(subs.unsubscribe(BlogId::new(1)));
        assert!(!subs.unsubscribe(BlogId::new(1)));
        assert!(subs.is_empty());
    }

    #[test]
    fn next_unread_scans_in_subscription_then_post_order() {
        let mut registry = BlogRegistry::new();
        let a = registry.create(AgentId::new(0), state(0)).unwrap();
        let b = registry.create(AgentId::new(1), state(1)).unwrap();
        registry.publish(b, state(2)).unwrap();

        let mut subs = SubscriptionSet::new();
        subs.subscribe(b);
        subs.subscribe(a);

        assert_eq!(subs.next_unread(&registry), Some((b, 0)));
        assert_eq!(subs.next_unread(&registry), Some((b, 1)));
        assert_eq!(subs.next_unread(&registry), Some((a, 0)));
        assert_eq!(subs.next_unread(&registry), None);

        registry.publish(a, state(3)).unwrap();
        assert_eq!(subs.next_unread(&registry), Some((a, 1)));
    }

    #[test]
    fn read_markers_survive_resubscribe() {
        let mut registry = BlogRegistry::new();
        let a = registry.create(AgentId::new(0), state(0)).unwrap();
        let mut subs = SubscriptionSet::new();
        subs.subscribe(a);
        assert_eq!(subs.next_unread(&registry), Some((a, 0)));
        subs.unsubscribe(a);
        subs.subscribe(a);
        assert_eq!(subs.next_unread(&registry), None);
        assert!(subs.has_read(a, 0));
    }
}
