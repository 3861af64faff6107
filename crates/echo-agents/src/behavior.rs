//! What an agent does when it is activated.
//!
//! Each activation is spent either offline (meet one landscape neighbor) or
//! online (write, or read the blogs it follows). The state machine:
//!
//! ```text
//! activation ──p_online──► online ──no blog──► p_start_blogging ─► start blog
//!     │                      │                        └────────► read
//!     │                      └──has blog─► p_write_post ──────► publish
//!     │                                         └──────────────► read
//!     └──────────────────► offline ─► (move) ─► meet neighbor
//! ```
//!
//! Reading discovers and prunes subscriptions, then consumes exactly one
//! unread post (and optionally some of its responses).

use echo_types::{AgentId, BlogId, CulturalState};
use echo_world::{Habitat, Landscape};
use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::agent::Agent;
use crate::blog::BlogRegistry;
use crate::error::AgentError;
use crate::interaction::{
    OpinionUpdate, adopt_features, relative_agreement, relative_agreement_toward, roll,
};

/// Probability of pruning uncomfortable subscriptions during a read.
pub const PRUNE_PROBABILITY: f64 = 0.4;

/// Probability of discovering another blog when between the subscription
/// minimum and maximum.
pub const EXTRA_DISCOVERY_PROBABILITY: f64 = 0.1;

/// Model-wide settings every activation needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Number of distinct values per feature (discrete variant).
    pub trait_count: u32,
    /// Convergence rate of relative agreement (opinion variant).
    pub mu: f64,
    /// Whether agents move before offline interactions.
    pub movement: bool,
    /// Whether copied traits can be garbled in transmission.
    pub transmission_error: bool,
    /// Whether readers also interact with a random subset of responses.
    pub read_responses: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            trait_count: 50,
            mu: 0.3,
            movement: true,
            transmission_error: false,
            read_responses: true,
        }
    }
}

/// Mutable model state an activation works on.
#[derive(Debug)]
pub struct ActContext<'a, L> {
    /// Landscape plus agents.
    pub habitat: &'a mut Habitat<L, Agent>,
    /// All blogs.
    pub registry: &'a mut BlogRegistry,
    /// Model-wide settings.
    pub settings: &'a EngineSettings,
}

/// What a single activation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    /// Met (or failed to find) a neighbor.
    Offline {
        /// The neighbor met, if any was in reach.
        partner: Option<AgentId>,
        /// Whether the actor's culture changed.
        changed: bool,
    },
    /// Created a blog with a first post.
    StartedBlog(BlogId),
    /// Published a post on the own blog.
    Posted {
        /// The blog written to.
        blog: BlogId,
        /// Index of the new post.
        post: usize,
    },
    /// Subscribed to a first blog and stopped.
    Subscribed(Option<BlogId>),
    /// Read one post.
    Read {
        /// The blog read.
        blog: BlogId,
        /// Index of the post read.
        post: usize,
        /// Number of cultural changes caused by the post and its responses.
        changes: u64,
        /// Whether a response was appended.
        responded: bool,
    },
    /// Went online but found nothing to read.
    Idle,
}

#[derive(Clone, Copy)]
enum Channel {
    Online,
    Offline,
}

fn count(agent: &mut Agent, channel: Channel) {
    match channel {
        Channel::Online => agent.online_interactions = agent.online_interactions.saturating_add(1),
        Channel::Offline => {
            agent.offline_interactions = agent.offline_interactions.saturating_add(1);
        }
    }
}

fn agent_ref<L: Landscape>(habitat: &Habitat<L, Agent>, id: AgentId) -> Result<&Agent, AgentError> {
    habitat.agent(id).ok_or(AgentError::AgentNotFound(id))
}

fn agent_mut<L: Landscape>(habitat: &mut Habitat<L, Agent>, id: AgentId) -> Result<&mut Agent, AgentError> {
    habitat.agent_mut(id).ok_or(AgentError::AgentNotFound(id))
}

/// Activate agent `id` once.
///
/// # Errors
///
/// Returns [`AgentError`] when `id` is unknown, the landscape rejects a
/// move, a blog referenced by the agent is missing, or two agents carry
/// cultures of different kinds. Any error aborts the run.
pub fn act<L: Landscape, R: Rng + ?Sized>(
    ctx: &mut ActContext<'_, L>,
    id: AgentId,
    rng: &mut R,
) -> Result<Activation, AgentError> {
    let p_online = agent_ref(ctx.habitat, id)?.profile.p_online;
    if roll(rng, p_online) {
        act_online(ctx, id, rng)
    } else {
        act_offline(ctx, id, rng)
    }
}

// ---------------------------------------------------------------------------
// Offline
// ---------------------------------------------------------------------------

fn act_offline<L: Landscape, R: Rng + ?Sized>(
    ctx: &mut ActContext<'_, L>,
    id: AgentId,
    rng: &mut R,
) -> Result<Activation, AgentError> {
    let profile = &agent_ref(ctx.habitat, id)?.profile;
    let (p_veloc, step_length) = (profile.p_veloc, profile.step_length);
    if ctx.settings.movement && roll(rng, p_veloc) {
        ctx.habitat
            .landscape_mut()
            .move_agent(id, step_length, rng)?;
    }

    let partner = ctx
        .habitat
        .landscape()
        .random_neighbor(id, rng)
        .filter(|p| *p != id);
    let Some(partner) = partner else {
        // Nobody in reach: self-interaction, which only marks time.
        let agent = agent_mut(ctx.habitat, id)?;
        if let Some(opinion) = agent.opinion() {
            agent.set_opinion(opinion);
        }
        return Ok(Activation::Offline {
            partner: None,
            changed: false,
        });
    };

    let changed = meet(ctx, id, partner, rng)?;
    trace!(agent = %id, partner = %partner, changed, "Offline interaction");
    Ok(Activation::Offline {
        partner: Some(partner),
        changed,
    })
}

fn meet<L: Landscape, R: Rng + ?Sized>(
    ctx: &mut ActContext<'_, L>,
    id: AgentId,
    partner: AgentId,
    rng: &mut R,
) -> Result<bool, AgentError> {
    let settings = *ctx.settings;
    let (actor, other) = ctx
        .habitat
        .pair_mut(id, partner)
        .ok_or(AgentError::AgentNotFound(partner))?;

    match (actor.opinion(), other.opinion()) {
        (Some(own), Some(theirs)) => {
            let (mine, yours) = relative_agreement(own, theirs, settings.mu);
            apply_opinion(actor, ctx.registry, mine, Channel::Offline)?;
            apply_opinion(other, ctx.registry, yours, Channel::Offline)?;
            Ok(mine.influenced)
        }
        (None, None) => {
            let understanding = actor.profile.understanding;
            let (Some(own), Some(theirs)) = (actor.features_mut(), other.culture().as_features())
            else {
                return Err(AgentError::CultureMismatch { agent: partner });
            };
            let changed = adopt_features(
                own,
                theirs,
                settings.trait_count,
                understanding,
                settings.transmission_error,
                rng,
            );
            if changed {
                count(actor, Channel::Offline);
            }
            Ok(changed)
        }
        _ => Err(AgentError::CultureMismatch { agent: partner }),
    }
}

/// Record an opinion update on `agent`, keeping its blog's topic in sync.
fn apply_opinion(
    agent: &mut Agent,
    registry: &mut BlogRegistry,
    update: OpinionUpdate,
    channel: Channel,
) -> Result<(), AgentError> {
    agent.set_opinion(update.opinion);
    if update.influenced {
        count(agent, channel);
        if let Some(blog) = agent.blog() {
            registry.extend_topic(blog, update.opinion.position)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Online
// ---------------------------------------------------------------------------

fn act_online<L: Landscape, R: Rng + ?Sized>(
    ctx: &mut ActContext<'_, L>,
    id: AgentId,
    rng: &mut R,
) -> Result<Activation, AgentError> {
    let agent = agent_ref(ctx.habitat, id)?;
    match agent.blog() {
        None => {
            if roll(rng, agent.profile.p_start_blogging) {
                let first_post = agent.culture().clone();
                let blog = ctx.registry.create(id, first_post)?;
                agent_mut(ctx.habitat, id)?.set_blog(blog);
                trace!(agent = %id, blog = %blog, "Started blog");
                return Ok(Activation::StartedBlog(blog));
            }
        }
        Some(blog) => {
            if roll(rng, agent.profile.p_write_post) {
                let message = agent.culture().clone();
                let post = ctx.registry.publish(blog, message)?;
                return Ok(Activation::Posted { blog, post });
            }
        }
    }
    read(ctx, id, rng)
}

fn read<L: Landscape, R: Rng + ?Sized>(
    ctx: &mut ActContext<'_, L>,
    id: AgentId,
    rng: &mut R,
) -> Result<Activation, AgentError> {
    let settings = *ctx.settings;
    let registry = &mut *ctx.registry;
    let agent = agent_mut(ctx.habitat, id)?;
    let range = agent.profile.subscriptions;

    let followed = agent.subscriptions.len();
    if followed == 0 {
        return discover(agent, registry).map(Activation::Subscribed);
    }
    if followed < range.min || (followed < range.max && roll(rng, EXTRA_DISCOVERY_PROBABILITY)) {
        discover(agent, registry)?;
    }
    if roll(rng, PRUNE_PROBABILITY) {
        prune(agent, registry)?;
    }

    let Some((blog, post)) = agent.subscriptions.next_unread(registry) else {
        return Ok(Activation::Idle);
    };
    let entry = registry
        .get(blog)
        .and_then(|b| b.post(post))
        .ok_or(AgentError::PostNotFound { blog, post })?;
    let message = entry.message.clone();
    let responses: Vec<CulturalState> = if settings.read_responses && !entry.responses.is_empty() {
        let total = entry.responses.len();
        let amount = rng.random_range(0..total);
        let mut picked = index::sample(rng, total, amount).into_vec();
        picked.sort_unstable();
        picked
            .into_iter()
            .filter_map(|i| entry.responses.get(i).cloned())
            .collect()
    } else {
        Vec::new()
    };

    let mut changes: u64 = 0;
    for snapshot in std::iter::once(&message).chain(&responses) {
        if absorb(agent, registry, snapshot, &settings, rng)? {
            changes = changes.saturating_add(1);
        }
    }

    let responded = roll(rng, agent.profile.p_respond);
    if responded {
        registry.respond(blog, post, agent.culture().clone())?;
    }
    Ok(Activation::Read {
        blog,
        post,
        changes,
        responded,
    })
}

/// Interact with an immutable snapshot. Returns whether the reader changed.
fn absorb<R: Rng + ?Sized>(
    agent: &mut Agent,
    registry: &mut BlogRegistry,
    snapshot: &CulturalState,
    settings: &EngineSettings,
    rng: &mut R,
) -> Result<bool, AgentError> {
    match snapshot {
        CulturalState::Opinion(theirs) => {
            let Some(own) = agent.opinion() else {
                return Err(AgentError::CultureMismatch { agent: agent.id() });
            };
            let update = relative_agreement_toward(own, *theirs, settings.mu);
            apply_opinion(agent, registry, update, Channel::Online)?;
            Ok(update.influenced)
        }
        CulturalState::Features(theirs) => {
            let understanding = agent.profile.understanding;
            let id = agent.id();
            let Some(own) = agent.features_mut() else {
                return Err(AgentError::CultureMismatch { agent: id });
            };
            let changed = adopt_features(
                own,
                theirs,
                settings.trait_count,
                understanding,
                settings.transmission_error,
                rng,
            );
            if changed {
                count(agent, Channel::Online);
            }
            Ok(changed)
        }
    }
}

/// Follow the best-matching blog. Already following it is a no-op.
fn discover(agent: &mut Agent, registry: &mut BlogRegistry) -> Result<Option<BlogId>, AgentError> {
    let id = agent.id();
    let Some(blog) = registry.best_match(agent.culture()) else {
        return Ok(None);
    };
    if agent.subscriptions.subscribe(blog) {
        registry.add_subscriber(blog, id)?;
        trace!(agent = %id, blog = %blog, "Subscribed");
    }
    Ok(Some(blog))
}

/// Drop followed blogs whose latest post left the comfort range.
fn prune(agent: &mut Agent, registry: &mut BlogRegistry) -> Result<(), AgentError> {
    let id = agent.id();
    let comfort = agent.profile.comfort;
    let uncomfortable: Vec<BlogId> = agent
        .subscriptions
        .iter()
        .filter(|&blog| {
            registry
                .latest_similarity(blog, agent.culture())
                .is_none_or(|similarity| !comfort.contains(similarity))
        })
        .collect();
    for blog in uncomfortable {
        agent.subscriptions.unsubscribe(blog);
        registry.remove_subscriber(blog, id)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::profile::{BehaviorProfile, Range};
    use echo_types::{FeatureVector, Opinion};
    use echo_world::{LinkGraph, Position, SpatialGrid};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn features(values: &[u32]) -> CulturalState {
        CulturalState::Features(FeatureVector::new(values.to_vec()).unwrap())
    }

    fn profile(p_online: f64) -> BehaviorProfile {
        BehaviorProfile {
            p_online,
            ..BehaviorProfile::default()
        }
    }

    fn network_habitat(cultures: Vec<CulturalState>, profile: &BehaviorProfile) -> Habitat<LinkGraph, Agent> {
        let graph = LinkGraph::complete(cultures.len()).unwrap();
        let mut cultures = cultures.into_iter();
        Habitat::populate(graph, |id| {
            let culture = cultures.next().ok_or(AgentError::AgentNotFound(id))?;
            Ok::<_, AgentError>(Agent::new(id, culture, profile.clone()))
        })
        .unwrap()
    }

    #[test]
    fn offline_meeting_changes_only_the_actor_for_features() {
        let p = profile(0.0);
        let mut habitat = network_habitat(vec![features(&[0, 1, 2, 3, 4]), features(&[0, 1, 2, 3, 0])], &p);
        let mut registry = BlogRegistry::new();
        let settings = EngineSettings::default();
        let mut rng = SmallRng::seed_from_u64(11);
        let mut ctx = ActContext {
            habitat: &mut habitat,
            registry: &mut registry,
            settings: &settings,
        };

        let mut changed_once = false;
        for _ in 0..50 {
            if let Activation::Offline { changed: true, partner } = act(&mut ctx, AgentId::new(0), &mut rng).unwrap() {
                assert_eq!(partner, Some(AgentId::new(1)));
                changed_once = true;
                break;
            }
        }
        assert!(changed_once);
        let actor = habitat.agent(AgentId::new(0)).unwrap();
        assert_eq!(actor.culture(), &features(&[0, 1, 2, 3, 0]));
        assert_eq!(actor.offline_interactions, 1);
        let partner = habitat.agent(AgentId::new(1)).unwrap();
        assert_eq!(partner.culture(), &features(&[0, 1, 2, 3, 0]));
        assert_eq!(partner.offline_interactions, 0);
    }

    #[test]
    fn isolated_opinion_agent_records_self_interaction() {
        let mut grid = SpatialGrid::new(10.0, 0.1).unwrap();
        let id = grid.place(Position { x: 1.0, y: 1.0 }).unwrap();
        let agent = Agent::new(
            id,
            CulturalState::Opinion(Opinion::new(0.3, 0.2).unwrap()),
            profile(0.0),
        );
        let mut habitat = Habitat::new(grid, vec![agent]).unwrap();

        let mut registry = BlogRegistry::new();
        let settings = EngineSettings {
            movement: false,
            ..EngineSettings::default()
        };
        let mut rng = SmallRng::seed_from_u64(5);
        let mut ctx = ActContext {
            habitat: &mut habitat,
            registry: &mut registry,
            settings: &settings,
        };
        let outcome = act(&mut ctx, id, &mut rng).unwrap();
        assert_eq!(outcome, Activation::Offline { partner: None, changed: false });
        assert_eq!(habitat.agent(id).unwrap().opinion_history(), &[0.3, 0.3]);
    }

    fn displacement(movement: bool) -> f64 {
        let mut grid = SpatialGrid::new(10.0, 0.1).unwrap();
        let start = Position { x: 5.0, y: 5.0 };
        let id = grid.place(start).unwrap();
        let p = BehaviorProfile {
            p_online: 0.0,
            p_veloc: 1.0,
            step_length: 2.0,
            ..BehaviorProfile::default()
        };
        let agent = Agent::new(id, features(&[1, 2, 3]), p);
        let mut habitat = Habitat::new(grid, vec![agent]).unwrap();
        let mut registry = BlogRegistry::new();
        let settings = EngineSettings {
            movement,
            ..EngineSettings::default()
        };
        let mut rng = SmallRng::seed_from_u64(3);
        let mut ctx = ActContext {
            habitat: &mut habitat,
            registry: &mut registry,
            settings: &settings,
        };
        act(&mut ctx, id, &mut rng).unwrap();
        let grid = habitat.landscape();
        grid.distance(start, grid.position(id).unwrap())
    }

    #[test]
    fn movement_rule_gates_displacement() {
        assert!(displacement(false).abs() < 1e-12);
        let moved = displacement(true);
        assert!(moved > 0.0);
        assert!(moved <= 2.0 + 1e-9);
    }

    #[test]
    fn online_agent_starts_blog_then_posts() {
        let p = BehaviorProfile {
            p_online: 1.0,
            p_start_blogging: 1.0,
            p_write_post: 1.0,
            ..BehaviorProfile::default()
        };
        let mut habitat = network_habitat(vec![features(&[1, 2]), features(&[1, 2])], &p);
        let mut registry = BlogRegistry::new();
        let settings = EngineSettings::default();
        let mut rng = SmallRng::seed_from_u64(2);
        let mut ctx = ActContext {
            habitat: &mut habitat,
            registry: &mut registry,
            settings: &settings,
        };

        let blog = BlogId::new(0);
        assert_eq!(act(&mut ctx, AgentId::new(0), &mut rng).unwrap(), Activation::StartedBlog(blog));
        let second = act(&mut ctx, AgentId::new(0), &mut rng).unwrap();
        assert_eq!(second, Activation::Posted { blog, post: 1 });
        assert_eq!(habitat.agent(AgentId::new(0)).unwrap().blog(), Some(blog));
        assert_eq!(registry.get(blog).unwrap().posts().len(), 2);
    }

    #[test]
    fn reader_subscribes_first_then_reads_in_order() {
        let writer = BehaviorProfile::default();
        let reader = BehaviorProfile {
            p_online: 1.0,
            p_start_blogging: 0.0,
            p_respond: 1.0,
            comfort: Range::new(0.0, 1.0),
            ..BehaviorProfile::default()
        };
        let graph = LinkGraph::complete(2).unwrap();
        let mut habitat = Habitat::populate(graph, |id| {
            let profile = if id.index() == 0 { writer.clone() } else { reader.clone() };
            Ok::<_, AgentError>(Agent::new(id, features(&[1, 1, 1]), profile))
        })
        .unwrap();
        let mut registry = BlogRegistry::new();
        let blog = registry.create(AgentId::new(0), features(&[1, 1, 1])).unwrap();
        habitat.agent_mut(AgentId::new(0)).unwrap().set_blog(blog);

        let settings = EngineSettings::default();
        let mut rng = SmallRng::seed_from_u64(9);
        let mut ctx = ActContext {
            habitat: &mut habitat,
            registry: &mut registry,
            settings: &settings,
        };
        let reader_id = AgentId::new(1);

        assert_eq!(act(&mut ctx, reader_id, &mut rng).unwrap(), Activation::Subscribed(Some(blog)));
        let outcome = act(&mut ctx, reader_id, &mut rng).unwrap();
        assert_eq!(
            outcome,
            Activation::Read {
                blog,
                post: 0,
                changes: 0,
                responded: true,
            }
        );
        assert_eq!(act(&mut ctx, reader_id, &mut rng).unwrap(), Activation::Idle);

        let blog_ref = registry.get(blog).unwrap();
        assert!(blog_ref.subscribers().contains(&reader_id));
        assert_eq!(blog_ref.response_count(), 1);
        assert!(blog_ref.is_echo_chamber());
    }

    #[test]
    fn pruning_drops_uncomfortable_blogs() {
        let mut registry = BlogRegistry::new();
        let far = registry.create(AgentId::new(0), features(&[9, 9, 9, 9])).unwrap();
        let near = registry.create(AgentId::new(1), features(&[1, 1, 1, 9])).unwrap();
        let mut agent = Agent::new(
            AgentId::new(2),
            features(&[1, 1, 1, 1]),
            BehaviorProfile {
                comfort: Range::new(0.4, 1.0),
                ..BehaviorProfile::default()
            },
        );
        for blog in [far, near] {
            agent.subscriptions.subscribe(blog);
            registry.add_subscriber(blog, AgentId::new(2)).unwrap();
        }

        prune(&mut agent, &mut registry).unwrap();
        assert_eq!(agent.subscriptions.iter().collect::<Vec<_>>(), vec![near]);
        assert!(registry.get(far).unwrap().subscribers().is_empty());
    }

    #[test]
    fn lone_blogger_discovers_own_blog() {
        let mut registry = BlogRegistry::new();
        let mut agent = Agent::new(AgentId::new(0), features(&[1, 1]), BehaviorProfile::default());
        let own = registry.create(AgentId::new(0), features(&[1, 1])).unwrap();
        agent.set_blog(own);

        assert_eq!(discover(&mut agent, &mut registry).unwrap(), Some(own));
        assert!(agent.subscriptions.contains(own));

        // The best blog is already followed: nothing new is subscribed.
        registry.create(AgentId::new(1), features(&[0, 1])).unwrap();
        assert_eq!(discover(&mut agent, &mut registry).unwrap(), Some(own));
        assert_eq!(agent.subscriptions.len(), 1);
        assert_eq!(registry.get(own).unwrap().subscribers().len(), 1);
    }

    #[test]
    fn offline_agreement_counts_only_influenced_parties() {
        // Overlap 0.2 exceeds agent 0's uncertainty but not agent 1's.
        let narrow = CulturalState::Opinion(Opinion::new(0.0, 0.1).unwrap());
        let wide = CulturalState::Opinion(Opinion::new(0.05, 0.5).unwrap());
        let mut habitat = network_habitat(vec![narrow, wide], &profile(0.0));
        let mut registry = BlogRegistry::new();
        let settings = EngineSettings::default();
        let mut rng = SmallRng::seed_from_u64(8);
        let mut ctx = ActContext {
            habitat: &mut habitat,
            registry: &mut registry,
            settings: &settings,
        };

        let outcome = act(&mut ctx, AgentId::new(1), &mut rng).unwrap();
        assert_eq!(
            outcome,
            Activation::Offline {
                partner: Some(AgentId::new(0)),
                changed: false,
            }
        );
        let narrow = habitat.agent(AgentId::new(0)).unwrap();
        assert_eq!(narrow.offline_interactions, 1);
        assert!(narrow.opinion().unwrap().position > 0.0);
        let wide = habitat.agent(AgentId::new(1)).unwrap();
        assert_eq!(wide.offline_interactions, 0);
        assert_eq!(wide.opinion_history().len(), 2);
    }

    #[test]
    fn reading_an_opinion_post_moves_the_reader() {
        let reader = BehaviorProfile {
            p_online: 1.0,
            p_start_blogging: 0.0,
            p_respond: 0.0,
            comfort: Range::new(0.0, 1.0),
            ..BehaviorProfile::default()
        };
        let graph = LinkGraph::complete(2).unwrap();
        let mut habitat = Habitat::populate(graph, |id| {
            Ok::<_, AgentError>(Agent::new(
                id,
                CulturalState::Opinion(Opinion::new(0.0, 0.5).unwrap()),
                reader.clone(),
            ))
        })
        .unwrap();
        let mut registry = BlogRegistry::new();
        let post = CulturalState::Opinion(Opinion::new(0.1, 0.3).unwrap());
        let blog = registry.create(AgentId::new(0), post).unwrap();

        let settings = EngineSettings {
            mu: 0.5,
            ..EngineSettings::default()
        };
        let mut rng = SmallRng::seed_from_u64(4);
        let mut ctx = ActContext {
            habitat: &mut habitat,
            registry: &mut registry,
            settings: &settings,
        };
        let reader_id = AgentId::new(1);
        act(&mut ctx, reader_id, &mut rng).unwrap();
        let outcome = act(&mut ctx, reader_id, &mut rng).unwrap();
        assert_eq!(
            outcome,
            Activation::Read {
                blog,
                post: 0,
                changes: 1,
                responded: false,
            }
        );
        let agent = habitat.agent(reader_id).unwrap();
        let opinion = agent.opinion().unwrap();
        assert!(opinion.position > 0.0);
        assert!(opinion.uncertainty < 0.5);
        assert_eq!(agent.online_interactions, 1);
    }
}
