//! Session worker that owns the authoritative [`WorldState`].
//!
//! Commands are processed strictly sequentially: one request completes
//! (including every synchronous state check) before the next begins, which
//! removes intra-session races on the controlled actor. Wrapped-item gift
//! lookups are spawned off-worker and their completions re-enter this
//! command stream, never running concurrently with the session's other
//! work.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use world_core::{
    Directive, EquipError, IntegrityError, ProtocolViolation, Rejection, Request, RequestPipeline,
    SessionContext, WorldState,
};

use crate::api::{Result, WorldHandle};
use crate::events::{Ack, Event, EventBus, WorldBroadcast};
use crate::loot;
use crate::oracles::OracleSet;
use crate::reconcile::{self, PendingWrappedOpen};
use crate::repository::{CharacterStore, GiftRecord, GiftRepository, LootStore, StorageError};

/// Commands that can be sent to the session worker.
pub enum Command {
    /// Validate and dispatch one client request.
    Submit {
        session: SessionContext,
        request: Request,
        reply: oneshot::Sender<Result<()>>,
    },

    /// A deferred gift lookup finished; reconcile it against current state.
    CompleteWrappedOpen {
        pending: PendingWrappedOpen,
        outcome: std::result::Result<Option<GiftRecord>, StorageError>,
    },

    /// Query the current world state (read-only snapshot).
    QueryWorld { reply: oneshot::Sender<WorldState> },
}

/// Background task that processes session commands.
pub struct SessionWorker {
    world: WorldState,
    oracles: OracleSet,
    gifts: Arc<dyn GiftRepository>,
    loot_store: Arc<dyn LootStore>,
    characters: Arc<dyn CharacterStore>,
    command_rx: mpsc::Receiver<Command>,
    command_tx: mpsc::Sender<Command>,
    bus: EventBus,
}

/// Spawns the session worker and returns the client-facing handle.
pub fn spawn_session_worker(
    world: WorldState,
    oracles: OracleSet,
    gifts: Arc<dyn GiftRepository>,
    loot_store: Arc<dyn LootStore>,
    characters: Arc<dyn CharacterStore>,
) -> (WorldHandle, tokio::task::JoinHandle<()>) {
    let (command_tx, command_rx) = mpsc::channel(256);
    let bus = EventBus::new();

    let worker = SessionWorker {
        world,
        oracles,
        gifts,
        loot_store,
        characters,
        command_rx,
        command_tx: command_tx.clone(),
        bus: bus.clone(),
    };
    let handle = WorldHandle::new(command_tx, bus);
    let join = tokio::spawn(worker.run());
    (handle, join)
}

impl SessionWorker {
    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(command) = self.command_rx.recv() => {
                    self.handle_command(command).await;
                }
                else => break,
            }
        }
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Submit {
                session,
                request,
                reply,
            } => {
                let result = self.handle_submit(session, &request).await;
                let _ = reply.send(result);
            }
            Command::CompleteWrappedOpen { pending, outcome } => {
                reconcile::complete(
                    &mut self.world,
                    &self.oracles,
                    self.characters.as_ref(),
                    pending,
                    outcome,
                )
                .await;
            }
            Command::QueryWorld { reply } => {
                let _ = reply.send(self.world.clone());
            }
        }
    }

    async fn handle_submit(&mut self, session: SessionContext, request: &Request) -> Result<()> {
        let outcome = {
            let env = self.oracles.as_env();
            RequestPipeline::new(&mut self.world).process(&env, session, request)
        };

        match outcome {
            Ok(directives) => {
                for directive in directives {
                    self.apply_directive(session, directive)?;
                }
                Ok(())
            }
            Err(rejection) => {
                self.handle_rejection(session, request, rejection);
                Ok(())
            }
        }
    }

    /// Translates one directive into an ack, a broadcast, a persistence
    /// request, or the deferred gift lookup.
    fn apply_directive(&mut self, session: SessionContext, directive: Directive) -> Result<()> {
        let to = session.player;
        match directive {
            Directive::CastPrepare {
                client_cast_id,
                server_cast_id,
            } => self.bus.publish(Event::Session {
                to,
                ack: Ack::CastPrepare {
                    client_cast_id,
                    server_cast_id,
                },
            }),
            Directive::BeginCast {
                caster,
                cast_id,
                spell,
                trigger,
                targets,
            } => self.bus.publish(Event::World(WorldBroadcast::CastStarted {
                caster,
                cast_id,
                spell,
                trigger,
                targets,
            })),
            Directive::InterruptCast {
                actor,
                category,
                spell,
            } => self
                .bus
                .publish(Event::World(WorldBroadcast::CastInterrupted {
                    actor,
                    category,
                    spell,
                })),
            Directive::AuraRemoved { actor, spell } => self
                .bus
                .publish(Event::World(WorldBroadcast::AuraRemoved { actor, spell })),
            Directive::ItemBound { owner, item } => self
                .bus
                .publish(Event::World(WorldBroadcast::ItemBound { owner, item })),
            Directive::UseObject { object, user } => self
                .bus
                .publish(Event::World(WorldBroadcast::ObjectUsed { object, user })),
            Directive::ObjectUseReported {
                object,
                entry,
                user,
            } => self
                .bus
                .publish(Event::World(WorldBroadcast::ObjectUseReported {
                    object,
                    entry,
                    user,
                })),
            Directive::Unsummoned { summon } => self
                .bus
                .publish(Event::World(WorldBroadcast::Unsummoned { summon })),
            Directive::SpellClick { target, clicker } => self
                .bus
                .publish(Event::World(WorldBroadcast::SpellClicked { target, clicker })),
            Directive::PetFeedback { pet, feedback } => self.bus.publish(Event::Session {
                to,
                ack: Ack::PetFeedback { pet, feedback },
            }),
            Directive::MirrorImage(data) => self.bus.publish(Event::Session {
                to,
                ack: Ack::MirrorImage(data),
            }),
            Directive::MissileCollisionBroadcast {
                caster,
                cast_id,
                position,
            } => self
                .bus
                .publish(Event::World(WorldBroadcast::MissileCollision {
                    caster,
                    cast_id,
                    position,
                })),
            Directive::OpenWrapped { slot, item } => {
                self.begin_wrapped_open(session, slot, item);
            }
            Directive::OpenContainer { slot, item } => {
                let env = self.oracles.as_env();
                loot::materialize(
                    &mut self.world,
                    &env,
                    self.loot_store.as_ref(),
                    &self.bus,
                    session.player,
                    slot,
                    item,
                )?;
            }
        }
        Ok(())
    }

    /// Issues the async gift lookup. The continuation re-enters this
    /// worker's sequential command stream via [`Command::CompleteWrappedOpen`].
    fn begin_wrapped_open(
        &self,
        session: SessionContext,
        slot: world_core::SlotRef,
        item: world_core::ItemGuid,
    ) {
        let pending = PendingWrappedOpen {
            session,
            slot,
            item,
        };
        let gifts = Arc::clone(&self.gifts);
        let command_tx = self.command_tx.clone();
        tokio::spawn(async move {
            let outcome = gifts.load(item).await;
            let _ = command_tx
                .send(Command::CompleteWrappedOpen { pending, outcome })
                .await;
        });
    }

    /// Applies the rejection taxonomy: rule failures become client error
    /// codes, protocol violations are logged as suspected exploitation,
    /// staleness stays silent, integrity errors get an error log alongside
    /// their client code.
    fn handle_rejection(&self, session: SessionContext, request: &Request, rejection: Rejection) {
        let player = session.player.0;
        match rejection {
            Rejection::Rule(code) => {
                self.bus.publish(Event::Session {
                    to: session.player,
                    ack: Ack::EquipFailure { code },
                });
            }
            Rejection::Protocol(violation) => {
                warn!(
                    target: "world::cheat",
                    player,
                    kind = request.kind(),
                    %violation,
                    "possible exploitation attempt"
                );
                // the client already treats the container as locked out
                if matches!(violation, ProtocolViolation::NotOpenable { .. }) {
                    self.bus.publish(Event::Session {
                        to: session.player,
                        ack: Ack::EquipFailure {
                            code: EquipError::LockedOut,
                        },
                    });
                }
            }
            Rejection::Integrity(violation) => {
                error!(
                    target: "world::storage",
                    player,
                    kind = request.kind(),
                    %violation,
                    "corrupt registry or persisted state"
                );
                if matches!(violation, IntegrityError::UnknownLock { .. }) {
                    self.bus.publish(Event::Session {
                        to: session.player,
                        ack: Ack::EquipFailure {
                            code: EquipError::AlreadyLocked,
                        },
                    });
                }
            }
            Rejection::Stale | Rejection::Ignored => {
                debug!(player, kind = request.kind(), "request dropped");
            }
            Rejection::Oracle(e) => {
                error!(kind = request.kind(), error = %e, "oracle unavailable");
            }
        }
    }
}
