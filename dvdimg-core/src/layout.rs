//! Per-title sector layout: one [`Block`] per [`Domain`] for every title slot.

use crate::{Block, Domain, TITLE_MAX};

/// The four domain blocks of one title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleBlocks {
    pub info: Block,
    pub menu: Block,
    pub vobs: Block,
    pub backup: Block,
}

impl Default for TitleBlocks {
    fn default() -> Self {
        Self {
            info: Block::MISSING,
            menu: Block::MISSING,
            vobs: Block::MISSING,
            backup: Block::MISSING,
        }
    }
}

impl TitleBlocks {
    pub fn get(&self, domain: Domain) -> Block {
        match domain {
            Domain::Info => self.info,
            Domain::MenuVobs => self.menu,
            Domain::TitleVobs => self.vobs,
            Domain::InfoBackup => self.backup,
        }
    }

    pub fn get_mut(&mut self, domain: Domain) -> &mut Block {
        match domain {
            Domain::Info => &mut self.info,
            Domain::MenuVobs => &mut self.menu,
            Domain::TitleVobs => &mut self.vobs,
            Domain::InfoBackup => &mut self.backup,
        }
    }
}

/// Blocks for every title slot, slot 0 being the video manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleLayout {
    titles: Vec<TitleBlocks>,
}

impl Default for TitleLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleLayout {
    /// A layout where every domain of every title is missing.
    pub fn new() -> Self {
        Self {
            titles: vec![TitleBlocks::default(); TITLE_MAX],
        }
    }

    /// Blocks for `title`. Panics if `title >= TITLE_MAX`.
    pub fn title(&self, title: u8) -> &TitleBlocks {
        &self.titles[title as usize]
    }

    pub fn title_mut(&mut self, title: u8) -> &mut TitleBlocks {
        &mut self.titles[title as usize]
    }

    pub fn block(&self, title: u8, domain: Domain) -> Block {
        self.title(title).get(domain)
    }

    /// Every (title, domain, block) triple, titles ascending, domains in disc order.
    pub fn entries(&self) -> impl Iterator<Item = (u8, Domain, Block)> + '_ {
        self.titles.iter().enumerate().flat_map(|(title, blocks)| {
            Domain::all()
                .iter()
                .map(move |&domain| (title as u8, domain, blocks.get(domain)))
        })
    }

    /// Total sectors claimed by existing blocks.
    pub fn total_sectors(&self) -> u64 {
        self.entries().map(|(_, _, block)| block.len()).sum()
    }
}
