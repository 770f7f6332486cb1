//! Game state model - the reference board adapter backed by shakmaty.
//!
//! Holds the move tree, the overlay marks the renderer draws, and the queue
//! of events the input session drains.

use std::collections::BTreeSet;

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{CastlingMode, Chess, EnPassantMode, File, Move, Position, Role, Square};
use tracing::{info, warn};

use crate::board::{Board, BoardEvent, LegalMove, PieceSetup};
use crate::config::{Config, PlayAs};
use crate::domain::chess::{color_from_shakmaty, from_square, kind_to_role, role_to_kind, to_square};
use crate::domain::{Coord, MoveTree, PieceColor, PieceKind, PlayedMove, shakmaty_to_piece};
use crate::error::BoardError;

/// Entries reachable through the menu keys, in key order
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MenuEntry {
    NewGame,
    SwitchSides,
    TakeBack,
    LogPosition,
}

impl MenuEntry {
    pub const ALL: [MenuEntry; 4] = [
        MenuEntry::NewGame,
        MenuEntry::SwitchSides,
        MenuEntry::TakeBack,
        MenuEntry::LogPosition,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuEntry::NewGame => "New game",
            MenuEntry::SwitchSides => "Switch sides",
            MenuEntry::TakeBack => "Take back",
            MenuEntry::LogPosition => "Log position",
        }
    }
}

/// Overlay drawn on top of the board
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Marks {
    pub selected: BTreeSet<Coord>,
    pub marked: BTreeSet<Coord>,
    pub arrows: BTreeSet<(Coord, Coord)>,
    /// Pending move preview
    pub target: Option<(Coord, Coord)>,
}

impl Marks {
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
            && self.marked.is_empty()
            && self.arrows.is_empty()
            && self.target.is_none()
    }
}

/// The main game model containing all chess game state
pub struct GameModel {
    /// The move tree containing all positions and variations
    tree: MoveTree,
    start: Chess,
    play_as: PlayAs,
    /// Board drawn upside down relative to the player's side
    flipped: bool,
    marks: Marks,
    alert: Option<String>,
    events: Vec<BoardEvent>,
}

impl GameModel {
    pub fn new(play_as: PlayAs) -> Self {
        Self::with_position(Chess::default(), play_as)
    }

    pub fn with_position(position: Chess, play_as: PlayAs) -> Self {
        Self {
            tree: MoveTree::with_root(position.clone()),
            start: position,
            play_as,
            flipped: false,
            marks: Marks::default(),
            alert: None,
            events: Vec::new(),
        }
    }

    pub fn from_fen(fen: &str, play_as: PlayAs) -> Result<Self, BoardError> {
        let fen: Fen = fen
            .parse()
            .map_err(|e: shakmaty::fen::ParseFenError| BoardError::InvalidFen(e.to_string()))?;
        let position: Chess = fen
            .into_position(CastlingMode::Standard)
            .map_err(|e| BoardError::InvalidFen(e.to_string()))?;
        Ok(Self::with_position(position, play_as))
    }

    /// The game described by a config: its start position and side
    pub fn from_config(config: &Config) -> Result<Self, BoardError> {
        match &config.start_fen {
            Some(fen) => Self::from_fen(fen, config.play_as),
            None => Ok(Self::new(config.play_as)),
        }
    }

    /// Get a reference to the move tree
    pub fn tree(&self) -> &MoveTree {
        &self.tree
    }

    /// Get the currently viewed position
    pub fn current_position(&self) -> &Chess {
        &self.tree.current().position
    }

    /// Get the turn for the currently viewed position
    pub fn current_turn(&self) -> PieceColor {
        color_from_shakmaty(self.current_position().turn())
    }

    pub fn fen(&self) -> String {
        Fen::from_position(self.current_position(), EnPassantMode::Legal).to_string()
    }

    /// SAN of the moves leading to the current position
    pub fn history(&self) -> Vec<String> {
        self.tree.history()
    }

    pub fn marks(&self) -> &Marks {
        &self.marks
    }

    /// Side drawn at the bottom of the board
    pub fn orientation(&self) -> PieceColor {
        let base = match self.play_as {
            PlayAs::Black => PieceColor::Black,
            _ => PieceColor::White,
        };
        if self.flipped { base.opponent() } else { base }
    }

    pub fn alert_message(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    fn options_updated(&mut self) {
        self.marks = Marks::default();
        self.events.push(BoardEvent::OptionsUpdated);
    }

    /// Apply a tree navigation step; an actual change resets the overlay
    fn navigate(&mut self, step: impl FnOnce(&mut MoveTree)) {
        let before = self.tree.current_id();
        step(&mut self.tree);
        if self.tree.current_id() != before {
            self.options_updated();
        }
    }

    fn switch_sides(&mut self) {
        self.play_as = match self.play_as {
            PlayAs::White => PlayAs::Black,
            PlayAs::Black => PlayAs::White,
            PlayAs::SideToMove => match self.current_turn() {
                PieceColor::White => PlayAs::Black,
                PieceColor::Black => PlayAs::White,
            },
            PlayAs::Spectator => PlayAs::Spectator,
        };
        info!(play_as = ?self.play_as, "switched sides");
        self.options_updated();
    }

    /// Map a shakmaty move to the squares the user types. Castling is
    /// entered as the king walking to the g or c file.
    fn typed_squares(m: &Move) -> Option<(Square, Square)> {
        match m {
            Move::Normal { from, to, .. } => Some((*from, *to)),
            Move::EnPassant { from, to, .. } => Some((*from, *to)),
            Move::Castle { king, rook, .. } => {
                let king_dest = if rook.file() == File::H {
                    Square::from_coords(File::G, rook.rank())
                } else {
                    Square::from_coords(File::C, rook.rank())
                };
                Some((*king, king_dest))
            }
            Move::Put { .. } => None,
        }
    }
}

impl Board for GameModel {
    fn legal_moves(&self) -> Vec<LegalMove> {
        if !self.is_players_turn() {
            return Vec::new();
        }
        let mut moves: Vec<LegalMove> = Vec::new();
        for m in &self.current_position().legal_moves() {
            let Some((from, to)) = Self::typed_squares(m) else {
                continue;
            };
            let legal = LegalMove {
                from: from_square(from),
                to: from_square(to),
                piece: role_to_kind(m.role()),
            };
            // Promotions come once per piece; the typed squares are the same
            if !moves.contains(&legal) {
                moves.push(legal);
            }
        }
        moves
    }

    fn pieces(&self) -> PieceSetup {
        let board = self.current_position().board();
        Square::ALL
            .into_iter()
            .filter_map(|sq| {
                board
                    .piece_at(sq)
                    .map(|p| (from_square(sq), shakmaty_to_piece(p)))
            })
            .collect()
    }

    fn playing_as(&self) -> Option<PieceColor> {
        match self.play_as {
            PlayAs::White => Some(PieceColor::White),
            PlayAs::Black => Some(PieceColor::Black),
            PlayAs::SideToMove => Some(self.current_turn()),
            PlayAs::Spectator => None,
        }
    }

    fn is_players_turn(&self) -> bool {
        self.playing_as() == Some(self.current_turn())
    }

    fn is_legal_move(&self, from: Coord, to: Coord) -> bool {
        self.legal_moves()
            .iter()
            .any(|m| m.from == from && m.to == to)
    }

    fn select_area(&mut self, square: Coord) {
        self.marks.selected.insert(square);
    }

    fn unselect_area(&mut self, square: Coord) {
        self.marks.selected.remove(&square);
    }

    fn mark_area(&mut self, square: Coord) {
        self.marks.marked.insert(square);
    }

    fn unmark_area(&mut self, square: Coord) {
        self.marks.marked.remove(&square);
        if self.marks.target.is_some_and(|(_, to)| to == square) {
            self.marks.target = None;
        }
    }

    fn mark_arrow(&mut self, from: Coord, to: Coord) {
        self.marks.arrows.insert((from, to));
    }

    fn unmark_arrow(&mut self, from: Coord, to: Coord) {
        self.marks.arrows.remove(&(from, to));
        if self.marks.target == Some((from, to)) {
            self.marks.target = None;
        }
    }

    fn clear_all_markings(&mut self) {
        self.marks = Marks::default();
    }

    fn target_area(&mut self, from: Coord, to: Coord) {
        self.marks.target = Some((from, to));
    }

    /// Play a move from one square to another.
    ///
    /// If the move already exists as a child of the current node, navigates
    /// to it; otherwise a new variation is created. Promotions default to a
    /// queen.
    fn make_move(
        &mut self,
        from: Coord,
        to: Coord,
        promotion: Option<PieceKind>,
    ) -> Result<(), BoardError> {
        let from_sq = to_square(from).ok_or(BoardError::InvalidSquare(from))?;
        let to_sq = to_square(to).ok_or(BoardError::InvalidSquare(to))?;
        let promote_to = promotion.and_then(kind_to_role).unwrap_or(Role::Queen);
        let position = self.current_position().clone();

        let chosen = position.legal_moves().into_iter().find(|m| {
            Self::typed_squares(m) == Some((from_sq, to_sq))
                && m.promotion().is_none_or(|role| role == promote_to)
        });
        let Some(m) = chosen else {
            return Err(BoardError::IllegalMove { from, to });
        };

        let san = San::from_move(&position, m.clone()).to_string();
        let next = position
            .play(m)
            .map_err(|_| BoardError::IllegalMove { from, to })?;

        self.tree.add_move(
            next,
            PlayedMove {
                from,
                to,
                san: san.clone(),
            },
        );
        self.marks = Marks::default();
        self.events.push(BoardEvent::Moved { from, to, san });
        Ok(())
    }

    fn flip_board(&mut self) {
        self.flipped = !self.flipped;
        self.options_updated();
    }

    fn next_move(&mut self) {
        self.navigate(|tree| {
            tree.go_forward();
        });
    }

    fn prev_move(&mut self) {
        self.navigate(|tree| {
            tree.go_back();
        });
    }

    fn first_move(&mut self) {
        self.navigate(MoveTree::go_to_root);
    }

    fn last_move(&mut self) {
        self.navigate(MoveTree::go_to_end);
    }

    fn press_menu(&mut self, index: usize) -> Result<(), BoardError> {
        let entry = MenuEntry::ALL
            .get(index)
            .copied()
            .ok_or(BoardError::NoMenuEntry(index))?;
        info!("menu: {}", entry.label());
        match entry {
            MenuEntry::NewGame => {
                self.tree = MoveTree::with_root(self.start.clone());
                self.options_updated();
            }
            MenuEntry::SwitchSides => self.switch_sides(),
            MenuEntry::TakeBack => self.prev_move(),
            MenuEntry::LogPosition => info!(fen = %self.fen(), "position"),
        }
        Ok(())
    }

    fn alert(&mut self, message: &str) {
        warn!("alert: {message}");
        self.alert = Some(message.to_string());
    }

    fn take_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for GameModel {
    fn default() -> Self {
        Self::new(PlayAs::default())
    }
}
