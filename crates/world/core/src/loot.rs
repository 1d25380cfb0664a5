//! First-open loot generation for container items.
//!
//! Generation is deterministic per item instance: every roll is seeded from
//! the item guid, so regenerating for the same instance always yields the
//! same payload. The runtime layers idempotent load/persist on top of this.

use crate::env::{OracleError, WorldEnv, loot_seed};
use crate::state::{ItemInstance, LootEntry, LootPayload};

/// Offset separating count-roll seeds from chance-roll seeds.
const COUNT_SEED_OFFSET: u32 = 0x1000;

/// Generates a fresh loot payload for a container item.
///
/// Rolls money from the template range, then each loot-table row
/// independently. An empty result is returned as an empty payload, not an
/// error; the caller decides how to surface "no loot".
pub fn generate(
    env: &WorldEnv<'_>,
    item: &ItemInstance,
    template: &crate::env::ItemTemplate,
) -> Result<LootPayload, OracleError> {
    let rng = env.rng()?;

    let mut money = 0;
    if let Some((min, max)) = template.money_loot {
        money = rng.range_u64(loot_seed(item.guid.0, 0), min, max);
    }

    let mut entries = Vec::new();
    for (row_index, row) in env.loot()?.table(template.entry).iter().enumerate() {
        let row_context = row_index as u32 + 1;
        if rng.percent(loot_seed(item.guid.0, row_context)) > row.chance {
            continue;
        }
        let count = rng.range_u64(
            loot_seed(item.guid.0, row_context + COUNT_SEED_OFFSET),
            row.min_count as u64,
            row.max_count as u64,
        ) as u16;
        entries.push(LootEntry {
            item_entry: row.item_entry,
            count,
            taken: false,
        });
    }

    Ok(LootPayload { money, entries })
}
