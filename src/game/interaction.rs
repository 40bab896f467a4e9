//! Interaction pass
//!
//! Tile side effects driven by where the player stands: picking up
//! collectables and opening doors with keys. Both passes only ever change
//! the map by swapping a symbol, and both are no-ops on a second call with
//! nothing left to do.

use crate::world::{BlockKind, BlockRegistry, TileMap, AIR};
use super::event::{DoorEvent, ItemCollectedEvent};
use super::player::{Item, Player};

/// Pick up whatever collectable sits in the player's cell
pub fn collect(
    map: &mut TileMap,
    blocks: &BlockRegistry,
    player: &mut Player,
) -> Option<ItemCollectedEvent> {
    let (col, row) = player.cell();
    let symbol = map.get(col, row)?;
    let block = blocks.lookup(symbol);
    if !block.collectable {
        return None;
    }

    map.set(col, row, AIR);
    match block.kind {
        BlockKind::Currency(amount) => player.collect_gold(amount),
        BlockKind::KeyItem => {
            player.keys += 1;
            player.add_item(Item::Key);
        }
        _ => {}
    }

    Some(ItemCollectedEvent {
        col,
        row,
        symbol,
        kind: block.kind,
    })
}

/// Open closed doors directly left and right of the player, one key each
pub fn action(
    map: &mut TileMap,
    blocks: &BlockRegistry,
    player: &mut Player,
) -> Vec<DoorEvent> {
    let (col, row) = player.cell();
    let mut opened = Vec::new();

    for side in [col - 1, col + 1] {
        let Some(symbol) = map.get(side, row) else {
            continue;
        };
        let BlockKind::DoorClosed { opens_to } = blocks.lookup(symbol).kind else {
            continue;
        };
        if player.keys == 0 {
            continue;
        }

        map.set(side, row, opens_to);
        player.keys -= 1;
        player.remove_item(Item::Key);
        opened.push(DoorEvent { col: side, row, closed: symbol, opened: opens_to });
    }

    opened
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::player::Position;
    use crate::game::settings::PhysicsSettings;

    fn player_at(x: f64, y: f64) -> Player {
        Player::new(Position::new(x, y), &PhysicsSettings::default())
    }

    #[test]
    fn test_collect_coin_is_idempotent() {
        let mut map = TileMap::build(&["  c "]);
        let blocks = BlockRegistry::default();
        let mut player = player_at(2.5, 0.5);

        let event = collect(&mut map, &blocks, &mut player).unwrap();
        assert_eq!(event.kind, BlockKind::Currency(1));
        assert_eq!((event.col, event.row), (2, 0));
        assert_eq!(player.gold, 1);
        assert_eq!(map.get(2, 0), Some(AIR));

        assert!(collect(&mut map, &blocks, &mut player).is_none());
        assert_eq!(player.gold, 1);
        assert_eq!(player.keys, 0);
    }

    #[test]
    fn test_collect_key() {
        let mut map = TileMap::build(&["k"]);
        let blocks = BlockRegistry::default();
        let mut player = player_at(0.2, 0.9);

        assert!(collect(&mut map, &blocks, &mut player).is_some());
        assert_eq!(player.keys, 1);
        assert_eq!(player.inventory, vec![Item::Key]);
        assert_eq!(player.gold, 0);
    }

    #[test]
    fn test_collect_ignores_solid_and_off_map() {
        let mut map = TileMap::build(&["s"]);
        let blocks = BlockRegistry::default();

        let mut player = player_at(0.5, 0.5);
        assert!(collect(&mut map, &blocks, &mut player).is_none());
        assert_eq!(map.get(0, 0), Some('s'));

        let mut player = player_at(3.5, 0.5);
        assert!(collect(&mut map, &blocks, &mut player).is_none());
    }

    #[test]
    fn test_door_consumes_one_key() {
        let mut map = TileMap::build(&["C  "]);
        let blocks = BlockRegistry::default();
        let mut player = player_at(1.5, 0.5);
        player.keys = 1;
        player.add_item(Item::Key);

        let opened = action(&mut map, &blocks, &mut player);
        assert_eq!(opened, vec![DoorEvent { col: 0, row: 0, closed: 'C', opened: 'O' }]);
        assert_eq!(map.get(0, 0), Some('O'));
        assert_eq!(player.keys, 0);
        assert!(player.inventory.is_empty());

        // Second call: door already open, no key left
        assert!(action(&mut map, &blocks, &mut player).is_empty());
        assert_eq!(map.get(0, 0), Some('O'));
        assert_eq!(player.keys, 0);
    }

    #[test]
    fn test_door_stays_closed_without_key() {
        let mut map = TileMap::build(&[" C"]);
        let blocks = BlockRegistry::default();
        let mut player = player_at(0.5, 0.5);

        assert!(action(&mut map, &blocks, &mut player).is_empty());
        assert_eq!(map.get(1, 0), Some('C'));
    }

    #[test]
    fn test_doors_on_both_sides() {
        let mut map = TileMap::build(&["C C"]);
        let blocks = BlockRegistry::default();
        let mut player = player_at(1.5, 0.5);
        player.keys = 1;

        // Only one key: left door opens first
        let opened = action(&mut map, &blocks, &mut player);
        assert_eq!(opened.len(), 1);
        assert_eq!(map.get(0, 0), Some('O'));
        assert_eq!(map.get(2, 0), Some('C'));

        player.keys = 1;
        action(&mut map, &blocks, &mut player);
        assert_eq!(map.get(2, 0), Some('O'));
    }
}
