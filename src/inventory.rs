//! tools, bounded block stacks & the hotbar selection
use arrayvec::ArrayVec;
use bevy::prelude::*;

use crate::block::{BlockType, HeldItem, Tool};
use crate::constants::MAX_BLOCK_SLOTS;

/// what the hotbar cursor points at
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// index into the fixed tool list
    Tool(usize),
    Block(BlockType),
}

#[derive(Clone, Debug)]
pub struct Inventory {
    tools: [Tool; 3],
    /// insertion ordered, one entry per distinct type
    blocks: ArrayVec<(BlockType, u32), MAX_BLOCK_SLOTS>,
    selection: Selection,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            tools: Tool::ALL,
            blocks: ArrayVec::new(),
            selection: Selection::Tool(0),
        }
    }
}

impl Inventory {
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn blocks(&self) -> &[(BlockType, u32)] {
        &self.blocks
    }

    pub fn count(&self, block: BlockType) -> u32 {
        self.blocks
            .iter()
            .find(|(kind, _)| *kind == block)
            .map_or(0, |&(_, n)| n)
    }

    pub fn has_block(&self, block: BlockType) -> bool {
        self.count(block) > 0
    }

    /// stack onto an existing type, or open a new slot if one is free
    pub fn add_block(&mut self, block: BlockType, count: u32) -> bool {
        if let Some((_, n)) = self.blocks.iter_mut().find(|(kind, _)| *kind == block) {
            *n += count;
            return true;
        }
        self.blocks.try_push((block, count)).is_ok()
    }

    /// take `count` of `block`; emptying the selected stack falls back to
    /// the first tool
    pub fn remove_block(&mut self, block: BlockType, count: u32) -> bool {
        let Some(idx) = self.blocks.iter().position(|(kind, _)| *kind == block) else {
            warn!("no {} in inventory", block.name());
            return false;
        };
        let n = &mut self.blocks[idx].1;
        if *n > count {
            *n -= count;
        } else {
            self.blocks.remove(idx);
            if self.selection == Selection::Block(block) || self.blocks.is_empty() {
                self.selection = Selection::Tool(0);
            }
        }
        true
    }

    /* ---------- selection ---------- */

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// hotkey `slot` (1‑based) over tools then block stacks; an empty slot
    /// selects the first tool
    pub fn select_slot(&mut self, slot: usize) {
        let index = slot.saturating_sub(1);
        self.selection = if index < self.tools.len() {
            Selection::Tool(index)
        } else {
            match self.blocks.get(index - self.tools.len()) {
                Some(&(kind, _)) => Selection::Block(kind),
                None => Selection::Tool(0),
            }
        };
        debug!("selected {:?}", self.selection);
    }

    pub fn is_tool_selected(&self) -> bool {
        matches!(self.selection, Selection::Tool(_))
    }

    /// index into the tool list or the block stacks, whichever is selected
    pub fn item_held(&self) -> usize {
        match self.selection {
            Selection::Tool(i) => i,
            Selection::Block(kind) => self
                .blocks
                .iter()
                .position(|(k, _)| *k == kind)
                .unwrap_or(0),
        }
    }

    /// combined hotbar index (tools first)
    pub fn hotbar_index(&self) -> usize {
        match self.selection {
            Selection::Tool(i) => i,
            Selection::Block(_) => self.tools.len() + self.item_held(),
        }
    }

    pub fn selected_block(&self) -> Option<BlockType> {
        match self.selection {
            Selection::Block(kind) => Some(kind),
            Selection::Tool(_) => None,
        }
    }

    pub fn held(&self) -> HeldItem {
        match self.selection {
            Selection::Tool(i) => HeldItem::Tool(self.tools[i]),
            Selection::Block(kind) => HeldItem::Block(kind),
        }
    }
}
