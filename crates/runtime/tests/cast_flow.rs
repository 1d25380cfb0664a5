use std::sync::Arc;

use runtime::{Ack, Event, MemoryStore, OracleSet, Topic, WorldBroadcast, spawn_session_worker};
use world_content::StaticRegistry;
use world_core::{
    ActorId, ActorKind, ActorState, CastCategory, CastRequest, EquipError, Position, Request,
    SessionContext, SlotRef, SpellAttributes, SpellDefinition, SpellId, TargetDescriptor,
    UseItemRequest, WorldState,
};

fn player_world() -> (WorldState, SessionContext) {
    let mut world = WorldState::new();
    world.add_actor(ActorState::new(
        ActorId(1),
        ActorKind::Player,
        Position::ORIGIN,
    ));
    (world, SessionContext::new(ActorId(1)))
}

fn spawn(world: WorldState, registry: StaticRegistry) -> runtime::WorldHandle {
    let store = Arc::new(MemoryStore::new());
    let oracles = OracleSet::from_registry(Arc::new(registry));
    let (handle, _join) =
        spawn_session_worker(world, oracles, store.clone(), store.clone(), store);
    handle
}

fn cast(spell: u32, client_cast_id: u64) -> Request {
    Request::CastSpell(CastRequest {
        spell: SpellId(spell),
        targets: TargetDescriptor::default(),
        client_cast_id,
        move_stop: None,
    })
}

#[tokio::test]
async fn cast_emits_prepare_ack_and_started_broadcast() {
    let registry = StaticRegistry::builder()
        .spell(SpellDefinition::new(SpellId(10), SpellAttributes::empty()))
        .build();
    let (mut world, session) = player_world();
    world
        .actor_mut(ActorId(1))
        .unwrap()
        .known_spells
        .insert(SpellId(10));

    let handle = spawn(world, registry);
    let mut session_rx = handle.subscribe(Topic::Session);
    let mut world_rx = handle.subscribe(Topic::World);

    handle.submit(session, cast(10, 42)).await.unwrap();

    let event = session_rx.recv().await.unwrap();
    let Event::Session {
        to,
        ack: Ack::CastPrepare {
            client_cast_id,
            server_cast_id,
        },
    } = event
    else {
        panic!("expected cast-prepare ack, got {event:?}");
    };
    assert_eq!(to, ActorId(1));
    assert_eq!(client_cast_id, 42);
    assert_ne!(server_cast_id.0, 42);

    let event = world_rx.recv().await.unwrap();
    assert!(matches!(
        event,
        Event::World(WorldBroadcast::CastStarted { caster, spell, .. })
            if caster == ActorId(1) && spell == SpellId(10)
    ));
}

#[tokio::test]
async fn rule_failure_surfaces_as_equip_error_ack() {
    let registry = StaticRegistry::builder().build();
    let (world, session) = player_world();
    let handle = spawn(world, registry);
    let mut session_rx = handle.subscribe(Topic::Session);

    // no item at the claimed slot
    handle
        .submit(
            session,
            Request::UseItem(UseItemRequest {
                slot: SlotRef::new(0, 0),
                item: world_core::ItemGuid(5),
                cast: CastRequest {
                    spell: SpellId(10),
                    targets: TargetDescriptor::default(),
                    client_cast_id: 1,
                    move_stop: None,
                },
            }),
        )
        .await
        .unwrap();

    let event = session_rx.recv().await.unwrap();
    assert!(matches!(
        event,
        Event::Session {
            ack: Ack::EquipFailure {
                code: EquipError::ItemNotFound
            },
            ..
        }
    ));
}

#[tokio::test]
async fn channel_cancel_only_interrupts_on_identity_match() {
    let registry = StaticRegistry::builder()
        .spell(SpellDefinition::new(
            SpellId(10),
            SpellAttributes::CHANNELED | SpellAttributes::POSITIVE,
        ))
        .spell(SpellDefinition::new(
            SpellId(11),
            SpellAttributes::CHANNELED | SpellAttributes::POSITIVE,
        ))
        .build();
    let (mut world, session) = player_world();
    world
        .actor_mut(ActorId(1))
        .unwrap()
        .known_spells
        .insert(SpellId(10));

    let handle = spawn(world, registry);
    let mut world_rx = handle.subscribe(Topic::World);

    handle.submit(session, cast(10, 1)).await.unwrap();
    // drain the cast-started broadcast
    let _ = world_rx.recv().await.unwrap();

    // mismatched claim leaves the channel running
    handle
        .submit(session, Request::CancelChannel { spell: SpellId(11) })
        .await
        .unwrap();
    let world_state = handle.query_world().await.unwrap();
    assert!(
        world_state
            .actor(ActorId(1))
            .unwrap()
            .casts
            .current(CastCategory::Channeled)
            .is_some()
    );

    // matching claim interrupts
    handle
        .submit(session, Request::CancelChannel { spell: SpellId(10) })
        .await
        .unwrap();
    let event = world_rx.recv().await.unwrap();
    assert!(matches!(
        event,
        Event::World(WorldBroadcast::CastInterrupted {
            category: CastCategory::Channeled,
            spell: SpellId(10),
            ..
        })
    ));
    let world_state = handle.query_world().await.unwrap();
    assert!(
        world_state
            .actor(ActorId(1))
            .unwrap()
            .casts
            .current(CastCategory::Channeled)
            .is_none()
    );
}
