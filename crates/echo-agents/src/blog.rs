//! Blogs, posts, and the registry that owns them.
//!
//! A blog is created together with its first post, so every blog in the
//! registry has at least one post. Blog ids are dense indices into the
//! registry in creation order, which is also the tie-breaking order used by
//! [`BlogRegistry::best_match`].

use std::collections::{BTreeMap, BTreeSet};

use echo_types::{AgentId, BlogId, CulturalState};
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// A response is approving when its similarity to the post exceeds this.
pub const APPROVAL_SIMILARITY: f64 = 0.5;

/// A blog is an echo chamber when its approval fraction exceeds this.
pub const ECHO_CHAMBER_APPROVAL: f64 = 0.64;

// ---------------------------------------------------------------------------
// Post
// ---------------------------------------------------------------------------

/// A snapshot of the writer's culture plus reader responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// The writer's culture at publication time.
    pub message: CulturalState,
    /// Snapshots of responders' cultures, in arrival order.
    pub responses: Vec<CulturalState>,
}

impl Post {
    /// Number of responses that approve of the post.
    pub fn approvals(&self) -> usize {
        self.responses
            .iter()
            .filter(|r| self.message.similarity(r) > APPROVAL_SIMILARITY)
            .count()
    }
}

// ---------------------------------------------------------------------------
// Topic bounds
// ---------------------------------------------------------------------------

/// Running min/max of the opinions a blog has carried.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopicBounds {
    /// Smallest opinion position seen.
    pub min: f64,
    /// Largest opinion position seen.
    pub max: f64,
}

impl TopicBounds {
    /// Bounds containing a single position.
    pub const fn at(position: f64) -> Self {
        Self {
            min: position,
            max: position,
        }
    }

    /// Grow the bounds to include `position`.
    pub fn extend(&mut self, position: f64) {
        self.min = self.min.min(position);
        self.max = self.max.max(position);
    }

    /// Width of the bounds.
    pub fn spread(&self) -> f64 {
        self.max - self.min
    }
}

// ---------------------------------------------------------------------------
// Blog
// ---------------------------------------------------------------------------

/// A blog: one writer, an ordered non-empty list of posts, subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    id: BlogId,
    writer: AgentId,
    posts: Vec<Post>,
    subscribers: BTreeSet<AgentId>,
    topic: Option<TopicBounds>,
}

impl Blog {
    fn new(id: BlogId, writer: AgentId, first_post: CulturalState) -> Self {
        let mut blog = Self {
            id,
            writer,
            posts: Vec::new(),
            subscribers: BTreeSet::new(),
            topic: None,
        };
        blog.publish(first_post);
        blog
    }

    fn publish(&mut self, message: CulturalState) {
        if let CulturalState::Opinion(opinion) = &message {
            self.extend_topic(opinion.position);
        }
        self.posts.push(Post {
            message,
            responses: Vec::new(),
        });
    }

    fn extend_topic(&mut self, position: f64) {
        match &mut self.topic {
            Some(bounds) => bounds.extend(position),
            None => self.topic = Some(TopicBounds::at(position)),
        }
    }

    /// This blog's id.
    pub const fn id(&self) -> BlogId {
        self.id
    }

    /// The agent who writes this blog.
    pub const fn writer(&self) -> AgentId {
        self.writer
    }

    /// All posts, oldest first.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// A post by index.
    pub fn post(&self, index: usize) -> Option<&Post> {
        self.posts.get(index)
    }

    /// The most recent post.
    pub fn latest_post(&self) -> Option<&Post> {
        self.posts.last()
    }

    /// Agents following this blog.
    pub const fn subscribers(&self) -> &BTreeSet<AgentId> {
        &self.subscribers
    }

    /// Opinion range this blog has carried (opinion variant only).
    pub const fn topic(&self) -> Option<TopicBounds> {
        self.topic
    }

    /// Total number of responses across all posts.
    pub fn response_count(&self) -> usize {
        self.posts.iter().map(|p| p.responses.len()).sum()
    }

    /// Fraction of approving responses, or `None` without responses.
    #[allow(clippy::cast_precision_loss)]
    pub fn approval(&self) -> Option<f64> {
        let total = self.response_count();
        if total == 0 {
            return None;
        }
        let approving: usize = self.posts.iter().map(Post::approvals).sum();
        Some(approving as f64 / total as f64)
    }

    /// Whether the approval fraction exceeds [`ECHO_CHAMBER_APPROVAL`].
    pub fn is_echo_chamber(&self) -> bool {
        self.approval()
            .is_some_and(|approval| approval > ECHO_CHAMBER_APPROVAL)
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Aggregate view over all blogs in a registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogStatistics {
    /// Number of blogs.
    pub blogs: usize,
    /// Number of posts across all blogs.
    pub posts: usize,
    /// Number of responses across all posts.
    pub comments: usize,
    /// Number of blogs that are echo chambers.
    pub echo_chambers: usize,
    /// Number of (agent, blog) follow relations.
    pub subscriptions: usize,
    /// Mean width of the topic bounds, over blogs that have any.
    pub mean_topic_spread: f64,
}

impl BlogStatistics {
    /// Echo chambers per blog, `0` when there are no blogs.
    #[allow(clippy::cast_precision_loss)]
    pub fn echo_chamber_ratio(&self) -> f64 {
        if self.blogs == 0 {
            return 0.0;
        }
        self.echo_chambers as f64 / self.blogs as f64
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Owns every blog of a model run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogRegistry {
    blogs: Vec<Blog>,
    by_writer: BTreeMap<AgentId, BlogId>,
}

impl BlogRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            blogs: Vec::new(),
            by_writer: BTreeMap::new(),
        }
    }

    /// Number of blogs.
    pub fn len(&self) -> usize {
        self.blogs.len()
    }

    /// Whether no blog exists yet.
    pub fn is_empty(&self) -> bool {
        self.blogs.is_empty()
    }

    /// All blogs in creation order.
    pub fn blogs(&self) -> &[Blog] {
        &self.blogs
    }

    /// Look up a blog.
    pub fn get(&self, id: BlogId) -> Option<&Blog> {
        self.blogs.get(id.index())
    }

    fn get_mut(&mut self, id: BlogId) -> Result<&mut Blog, AgentError> {
        self.blogs
            .get_mut(id.index())
            .ok_or(AgentError::BlogNotFound(id))
    }

    /// The blog written by `writer`, if any.
    pub fn blog_of(&self, writer: AgentId) -> Option<BlogId> {
        self.by_writer.get(&writer).copied()
    }

    /// Create a blog for `writer` whose first post is `first_post`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::AlreadyBlogging`] if `writer` already has a
    /// blog, or [`AgentError::RegistryFull`] when ids are exhausted.
    pub fn create(
        &mut self,
        writer: AgentId,
        first_post: CulturalState,
    ) -> Result<BlogId, AgentError> {
        if let Some(blog) = self.blog_of(writer) {
            return Err(AgentError::AlreadyBlogging {
                agent: writer,
                blog,
            });
        }
        let id = BlogId::from_index(self.blogs.len()).ok_or(AgentError::RegistryFull)?;
        self.blogs.push(Blog::new(id, writer, first_post));
        self.by_writer.insert(writer, id);
        Ok(id)
    }

    /// Append a post to a blog.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::BlogNotFound`] for an unknown blog.
    pub fn publish(&mut self, blog: BlogId, message: CulturalState) -> Result<usize, AgentError> {
        let target = self.get_mut(blog)?;
        target.publish(message);
        Ok(target.posts.len().saturating_sub(1))
    }

    /// Append a response to a post.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::BlogNotFound`] or [`AgentError::PostNotFound`].
    pub fn respond(
        &mut self,
        blog: BlogId,
        post: usize,
        response: CulturalState,
    ) -> Result<(), AgentError> {
        let target = self.get_mut(blog)?;
        let entry = target
            .posts
            .get_mut(post)
            .ok_or(AgentError::PostNotFound { blog, post })?;
        entry.responses.push(response);
        Ok(())
    }

    /// Grow a blog's topic bounds to include `position`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::BlogNotFound`] for an unknown blog.
    pub fn extend_topic(&mut self, blog: BlogId, position: f64) -> Result<(), AgentError> {
        self.get_mut(blog)?.extend_topic(position);
        Ok(())
    }

    /// Record that `agent` follows `blog`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::BlogNotFound`] for an unknown blog.
    pub fn add_subscriber(&mut self, blog: BlogId, agent: AgentId) -> Result<(), AgentError> {
        self.get_mut(blog)?.subscribers.insert(agent);
        Ok(())
    }

    /// Record that `agent` no longer follows `blog`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::BlogNotFound`] for an unknown blog.
    pub fn remove_subscriber(&mut self, blog: BlogId, agent: AgentId) -> Result<(), AgentError> {
        self.get_mut(blog)?.subscribers.remove(&agent);
        Ok(())
    }

    /// Similarity between `culture` and a blog's latest post.
    pub fn latest_similarity(&self, blog: BlogId, culture: &CulturalState) -> Option<f64> {
        self.get(blog)
            .and_then(Blog::latest_post)
            .map(|post| culture.similarity(&post.message))
    }

    /// The blog whose latest post is most similar to `culture`.
    ///
    /// Every blog is ranked, including the reader's own and blogs it already
    /// follows. Ties go to the blog created first. Returns `None` only when
    /// the registry holds no blogs.
    pub fn best_match(&self, culture: &CulturalState) -> Option<BlogId> {
        let mut best: Option<(BlogId, f64)> = None;
        for blog in &self.blogs {
            let Some(post) = blog.latest_post() else {
                continue;
            };
            let score = culture.similarity(&post.message);
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((blog.id, score));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Aggregate counts over all blogs.
    #[allow(clippy::cast_precision_loss)]
    pub fn statistics(&self) -> BlogStatistics {
        let mut stats = BlogStatistics {
            blogs: self.blogs.len(),
            ..BlogStatistics::default()
        };
        let mut spread_sum = 0.0;
        let mut spread_count = 0_usize;
        for blog in &self.blogs {
            stats.posts = stats.posts.saturating_add(blog.posts.len());
            stats.comments = stats.comments.saturating_add(blog.response_count());
            stats.subscriptions = stats.subscriptions.saturating_add(blog.subscribers.len());
            if blog.is_echo_chamber() {
                stats.echo_chambers = stats.echo_chambers.saturating_add(1);
            }
            if let Some(topic) = blog.topic {
                spread_sum += topic.spread();
                spread_count = spread_count.saturating_add(1);
            }
        }
        if spread_count > 0 {
            stats.mean_topic_spread = spread_sum / spread_count as f64;
        }
        stats
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use echo_types::{FeatureVector, Opinion};

    fn features(values: &[u32]) -> CulturalState {
        CulturalState::Features(FeatureVector::new(values.to_vec()).unwrap())
    }

    fn opinion(position: f64) -> CulturalState {
        CulturalState::Opinion(Opinion::new(position, 0.2).unwrap())
    }

    #[test]
    fn create_publishes_first_post() {
        let mut registry = BlogRegistry::new();
        let id = registry.create(AgentId::new(3), features(&[1, 2])).unwrap();
        let blog = registry.get(id).unwrap();
        assert_eq!(blog.writer(), AgentId::new(3));
        assert_eq!(blog.posts().len(), 1);
        assert_eq!(registry.blog_of(AgentId::new(3)), Some(id));
    }

    #[test]
    fn writer_cannot_start_second_blog() {
        let mut registry = BlogRegistry::new();
        registry.create(AgentId::new(0), features(&[1])).unwrap();
        let err = registry.create(AgentId::new(0), features(&[2])).unwrap_err();
        assert!(matches!(err, AgentError::AlreadyBlogging { .. }));
    }

    #[test]
    fn publish_and_respond() {
        let mut registry = BlogRegistry::new();
        let id = registry.create(AgentId::new(0), features(&[1, 1])).unwrap();
        let index = registry.publish(id, features(&[1, 2])).unwrap();
        assert_eq!(index, 1);
        registry.respond(id, 1, features(&[1, 2])).unwrap();
        assert_eq!(registry.get(id).unwrap().response_count(), 1);

        let missing = registry.respond(id, 9, features(&[1, 2])).unwrap_err();
        assert_eq!(missing, AgentError::PostNotFound { blog: id, post: 9 });
        let unknown = registry.publish(BlogId::new(5), features(&[1, 2])).unwrap_err();
        assert_eq!(unknown, AgentError::BlogNotFound(BlogId::new(5)));
    }

    #[test]
    fn approval_and_echo_chambers() {
        let mut registry = BlogRegistry::new();
        let echo = registry.create(AgentId::new(0), features(&[1, 1, 1, 1])).unwrap();
        let open = registry.create(AgentId::new(1), features(&[2, 2, 2, 2])).unwrap();
        let silent = registry.create(AgentId::new(2), features(&[3, 3, 3, 3])).unwrap();

        // Three of four approve: 0.75 > 0.64.
        for r in [[1, 1, 1, 1], [1, 1, 1, 0], [1, 1, 1, 1], [0, 0, 0, 0]] {
            registry.respond(echo, 0, features(&r)).unwrap();
        }
        // One of two approves: 0.5.
        registry.respond(open, 0, features(&[2, 2, 2, 2])).unwrap();
        registry.respond(open, 0, features(&[0, 0, 0, 0])).unwrap();

        assert!(registry.get(echo).unwrap().is_echo_chamber());
        assert!(!registry.get(open).unwrap().is_echo_chamber());
        assert!(!registry.get(silent).unwrap().is_echo_chamber());
        assert_eq!(registry.get(silent).unwrap().approval(), None);

        let stats = registry.statistics();
        assert_eq!(stats.blogs, 3);
        assert_eq!(stats.posts, 3);
        assert_eq!(stats.comments, 6);
        assert_eq!(stats.echo_chambers, 1);
        assert!((stats.echo_chamber_ratio() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn ratio_is_zero_without_blogs() {
        let stats = BlogRegistry::new().statistics();
        assert_eq!(stats.blogs, 0);
        assert!(stats.echo_chamber_ratio().abs() < f64::EPSILON);
    }

    #[test]
    fn best_match_uses_latest_post_and_breaks_ties_by_age() {
        let mut registry = BlogRegistry::new();
        let first = registry.create(AgentId::new(0), features(&[1, 1])).unwrap();
        let second = registry.create(AgentId::new(1), features(&[1, 1])).unwrap();
        let reader = features(&[1, 1]);

        assert_eq!(registry.best_match(&reader), Some(first));

        registry.publish(first, features(&[0, 0])).unwrap();
        assert_eq!(registry.best_match(&reader), Some(second));
    }

    #[test]
    fn best_match_ranks_every_blog() {
        let mut registry = BlogRegistry::new();
        assert_eq!(registry.best_match(&features(&[1, 1])), None);

        // A lone blogger still finds its own blog.
        let own = registry.create(AgentId::new(0), features(&[1, 1])).unwrap();
        assert_eq!(registry.best_match(&features(&[1, 1])), Some(own));

        // The closest blog wins even when a worse one exists.
        registry.create(AgentId::new(1), features(&[1, 0])).unwrap();
        assert_eq!(registry.best_match(&features(&[1, 1])), Some(own));
    }

    #[test]
    fn topic_bounds_track_posted_opinions() {
        let mut registry = BlogRegistry::new();
        let id = registry.create(AgentId::new(0), opinion(0.1)).unwrap();
        registry.publish(id, opinion(-0.3)).unwrap();
        registry.extend_topic(id, 0.5).unwrap();
        let topic = registry.get(id).unwrap().topic().unwrap();
        assert!((topic.min + 0.3).abs() < 1e-12);
        assert!((topic.max - 0.5).abs() < 1e-12);
        assert!((registry.statistics().mean_topic_spread - 0.8).abs() < 1e-12);
    }

    #[test]
    fn subscribers_are_tracked() {
        let mut registry = BlogRegistry::new();
        let id = registry.create(AgentId::new(0), features(&[1])).unwrap();
        registry.add_subscriber(id, AgentId::new(4)).unwrap();
        registry.add_subscriber(id, AgentId::new(4)).unwrap();
        assert_eq!(registry.statistics().subscriptions, 1);
        registry.remove_subscriber(id, AgentId::new(4)).unwrap();
        assert!(registry.get(id).unwrap().subscribers().is_empty());
    }
}
