//! Core incremental board state representation.
//!
//! `GameState` owns every piece of one game in a flat arena. The 64-square
//! table and the two colour registries hold arena indices only. All mutation
//! goes through [`GameState::apply_move`] / [`GameState::undo_move`], which
//! keep the Zobrist key and the material balance up to date incrementally.
//! Both must be called in strict last-in-first-out order.

use crate::chess_errors::{EngineError, EngineResult};
use crate::game_state::chess_rules::{castling_geometry, CastlingWing};
use crate::game_state::chess_types::*;
use crate::game_state::undo_state::AppliedMove;
use crate::search::zobrist::{compute_zobrist_key, piece_square_key, state_key};
use crate::utils::algebraic::square_name;
use crate::utils::fen_parser::parse_fen;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: [Option<PieceId>; 64],
    occupancy: u64,
    pieces: Vec<PieceRecord>,
    registers: [PieceRegister; 2],

    engine_color: Color,
    side_to_move: Color,
    ply: u16,

    /// Engine material minus opponent material gained since setup, in pawns.
    material_balance: i32,
    zobrist_key: u64,
}

impl GameState {
    /// An empty board. Pieces are added with `place_piece` and the derived
    /// fields computed by `finish_setup`.
    pub(crate) fn empty(engine_color: Color) -> Self {
        Self {
            board: [None; 64],
            occupancy: 0,
            pieces: Vec::with_capacity(40),
            registers: [PieceRegister::new(), PieceRegister::new()],
            engine_color,
            side_to_move: Color::Light,
            ply: 0,
            material_balance: 0,
            zobrist_key: 0,
        }
    }

    /// Standard starting arrangement with the engine playing `engine_color`.
    pub fn new_game(engine_color: Color) -> Self {
        let mut game_state = Self::empty(engine_color);

        for (file, kind) in BACK_RANK.iter().enumerate() {
            game_state.place_piece(PieceRecord::new(*kind, Color::Light, file as Square));
        }
        for square in 8..16 {
            game_state.place_piece(PieceRecord::new(PieceKind::Pawn, Color::Light, square));
        }
        for square in 48..56 {
            game_state.place_piece(PieceRecord::new(PieceKind::Pawn, Color::Dark, square));
        }
        for (file, kind) in BACK_RANK.iter().enumerate() {
            game_state.place_piece(PieceRecord::new(*kind, Color::Dark, 56 + file as Square));
        }

        game_state.side_to_move = Color::Light;
        game_state.zobrist_key = compute_zobrist_key(&game_state);
        game_state
    }

    #[inline]
    pub fn from_fen(fen: &str, engine_color: Color) -> EngineResult<Self> {
        parse_fen(fen, engine_color)
    }

    pub(crate) fn place_piece(&mut self, record: PieceRecord) -> PieceId {
        let id = self.pieces.len();
        self.pieces.push(record);
        self.registers[record.color.index()].push(record.kind, id);
        self.set_square(record.square, Some(id));
        id
    }

    pub(crate) fn piece_mut(&mut self, id: PieceId) -> &mut PieceRecord {
        &mut self.pieces[id]
    }

    /// Finalise a hand-built position: side to move, ply, starting material
    /// and the full hash.
    pub(crate) fn finish_setup(&mut self, side_to_move: Color, ply: u16) -> EngineResult<()> {
        for color in [Color::Light, Color::Dark] {
            let kings = self.registers[color.index()].ids(PieceKind::King).len();
            if kings != 1 {
                return Err(EngineError::InvalidFen(format!(
                    "{color:?} must have exactly one king, found {kings}"
                )));
            }
        }

        self.side_to_move = side_to_move;
        self.ply = ply;
        self.material_balance = self
            .pieces
            .iter()
            .filter(|p| !p.captured && p.kind != PieceKind::King)
            .map(|p| self.side_sign(p.color) * p.kind.value())
            .sum();
        self.zobrist_key = compute_zobrist_key(self);
        Ok(())
    }

    #[inline]
    pub fn engine_color(&self) -> Color {
        self.engine_color
    }

    #[inline]
    pub fn opponent_color(&self) -> Color {
        self.engine_color.opposite()
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn ply(&self) -> u16 {
        self.ply
    }

    #[inline]
    pub fn material_balance(&self) -> i32 {
        self.material_balance
    }

    #[inline]
    pub fn zobrist_key(&self) -> u64 {
        self.zobrist_key
    }

    #[inline]
    pub fn occupancy(&self) -> u64 {
        self.occupancy
    }

    #[inline]
    pub fn piece(&self, id: PieceId) -> &PieceRecord {
        &self.pieces[id]
    }

    #[inline]
    pub fn piece_id_on(&self, square: Square) -> Option<PieceId> {
        self.board[square as usize]
    }

    #[inline]
    pub fn piece_on(&self, square: Square) -> Option<&PieceRecord> {
        self.board[square as usize].map(|id| &self.pieces[id])
    }

    #[inline]
    pub fn register(&self, color: Color) -> &PieceRegister {
        &self.registers[color.index()]
    }

    /// Ids of the uncaptured pieces of one colour and kind.
    pub fn live_pieces(&self, color: Color, kind: PieceKind) -> impl Iterator<Item = PieceId> + '_ {
        self.registers[color.index()]
            .ids(kind)
            .iter()
            .copied()
            .filter(move |&id| !self.pieces[id].captured)
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.registers[color.index()]
            .king()
            .map(|id| self.pieces[id].square)
    }

    /// King and rook of `wing` both on their home squares and never moved.
    pub fn has_castling_right(&self, color: Color, wing: CastlingWing) -> bool {
        let geometry = castling_geometry(color, wing);
        let king_unmoved = self.registers[color.index()]
            .king()
            .map(|id| &self.pieces[id])
            .is_some_and(|king| king.square == geometry.king_from && king.move_count == 0);

        let rook_unmoved = self.piece_on(geometry.rook_from).is_some_and(|rook| {
            rook.kind == PieceKind::Rook
                && rook.color == color
                && rook.move_count == 0
                && rook.promoted_from.is_none()
        });

        king_unmoved && rook_unmoved
    }

    /// File of a pawn that advanced two squares on the previous ply, when an
    /// enemy pawn stands beside it and could take it en passant.
    pub fn en_passant_file(&self) -> Option<u8> {
        let mover = self.side_to_move.opposite();
        let pawn = self.registers[mover.index()]
            .ids(PieceKind::Pawn)
            .iter()
            .map(|&id| &self.pieces[id])
            .find(|p| !p.captured && p.double_push_ply == Some(self.ply))?;

        let file = file_of(pawn.square);
        let beside = [file.checked_sub(1), (file < 7).then_some(file + 1)];
        let capturable = beside.into_iter().flatten().any(|f| {
            let square = rank_of(pawn.square) * 8 + f;
            self.piece_on(square).is_some_and(|p| {
                p.kind == PieceKind::Pawn && p.color == self.side_to_move
            })
        });

        capturable.then_some(file)
    }

    /// +1 for the engine's colour, -1 for the opponent's.
    #[inline]
    fn side_sign(&self, color: Color) -> i32 {
        if color == self.engine_color {
            1
        } else {
            -1
        }
    }

    #[inline]
    fn set_square(&mut self, square: Square, occupant: Option<PieceId>) {
        self.board[square as usize] = occupant;
        match occupant {
            Some(_) => self.occupancy |= square_mask(square),
            None => self.occupancy &= !square_mask(square),
        }
    }

    #[inline]
    fn toggle_piece_key(&mut self, record: &PieceRecord, square: Square) {
        self.zobrist_key ^= piece_square_key(record.color, record.kind, square);
    }

    /// Play `mv` on the board.
    ///
    /// Returns `EngineError::Invariant` when the origin square is empty; that
    /// is a caller defect, not a user input problem.
    pub fn apply_move(&mut self, mv: &Move) -> EngineResult<()> {
        let Some(mover_id) = self.board[mv.from as usize] else {
            log::error!("apply_move called with empty origin {}", square_name(mv.from));
            return Err(EngineError::Invariant(format!(
                "apply_move from empty square {}",
                square_name(mv.from)
            )));
        };

        self.zobrist_key ^= state_key(self);
        let mover = self.pieces[mover_id];

        if let Some(captured_id) = mv.captured {
            let captured = self.pieces[captured_id];
            self.pieces[captured_id].captured = true;
            self.material_balance -= self.side_sign(captured.color) * captured.kind.value();
            self.toggle_piece_key(&captured, captured.square);
            self.set_square(captured.square, None);
        }

        self.toggle_piece_key(&mover, mv.from);
        self.toggle_piece_key(&mover, mv.to);
        self.set_square(mv.from, None);
        self.set_square(mv.to, Some(mover_id));
        self.pieces[mover_id].square = mv.to;
        self.pieces[mover_id].move_count += 1;
        self.ply += 1;

        if let Some((rook_from, rook_to)) = mv.castling {
            let Some(rook_id) = self.board[rook_from as usize] else {
                return Err(EngineError::Invariant(format!(
                    "castling rook missing on {}",
                    square_name(rook_from)
                )));
            };
            let rook = self.pieces[rook_id];
            self.toggle_piece_key(&rook, rook_from);
            self.toggle_piece_key(&rook, rook_to);
            self.set_square(rook_from, None);
            self.set_square(rook_to, Some(rook_id));
            self.pieces[rook_id].square = rook_to;
            self.pieces[rook_id].move_count += 1;
        } else if mover.kind == PieceKind::Pawn && mv.from.abs_diff(mv.to) == 16 {
            self.pieces[mover_id].double_push_ply = Some(self.ply);
        } else if let Some(kind) = mv.promotion {
            let promoted_id = self.pieces.len();
            let mut promoted = PieceRecord::new(kind, mover.color, mv.to);
            promoted.promoted_from = Some(mover_id);

            self.pieces.push(promoted);
            self.registers[mover.color.index()].push(kind, promoted_id);
            self.pieces[mover_id].captured = true;
            self.set_square(mv.to, Some(promoted_id));
            self.toggle_piece_key(&mover, mv.to);
            self.toggle_piece_key(&promoted, mv.to);
            self.material_balance +=
                self.side_sign(mover.color) * (kind.value() - PieceKind::Pawn.value());
        }

        self.side_to_move = self.side_to_move.opposite();
        self.zobrist_key ^= state_key(self);
        Ok(())
    }

    /// Exact inverse of [`GameState::apply_move`] for the most recently
    /// applied move.
    pub fn undo_move(&mut self, mv: &Move) -> EngineResult<()> {
        let Some(top_id) = self.board[mv.to as usize] else {
            return Err(EngineError::Invariant(format!(
                "undo_move with empty destination {}",
                square_name(mv.to)
            )));
        };
        let Some(previous_ply) = self.ply.checked_sub(1) else {
            return Err(EngineError::Invariant("undo_move at ply zero".to_owned()));
        };

        self.zobrist_key ^= state_key(self);
        let top = self.pieces[top_id];
        let mut mover_id = top_id;

        if let Some(pawn_id) = top.promoted_from {
            if top.move_count == 0 {
                let popped = self.registers[top.color.index()].pop(top.kind);
                if popped != Some(top_id) || top_id + 1 != self.pieces.len() {
                    return Err(EngineError::Invariant(format!(
                        "promotion on {} undone out of order",
                        square_name(mv.to)
                    )));
                }
                self.pieces.pop();

                let pawn = self.pieces[pawn_id];
                self.toggle_piece_key(&top, mv.to);
                self.toggle_piece_key(&pawn, mv.to);
                self.material_balance -=
                    self.side_sign(top.color) * (top.kind.value() - PieceKind::Pawn.value());
                self.pieces[pawn_id].captured = false;
                self.set_square(mv.to, Some(pawn_id));
                mover_id = pawn_id;
            }
        }

        let mover = self.pieces[mover_id];
        self.toggle_piece_key(&mover, mv.to);
        self.toggle_piece_key(&mover, mv.from);
        self.set_square(mv.to, None);
        self.set_square(mv.from, Some(mover_id));
        self.pieces[mover_id].square = mv.from;
        self.pieces[mover_id].move_count = mover.move_count.saturating_sub(1);

        if let Some((rook_from, rook_to)) = mv.castling {
            let Some(rook_id) = self.board[rook_to as usize] else {
                return Err(EngineError::Invariant(format!(
                    "castled rook missing on {}",
                    square_name(rook_to)
                )));
            };
            let rook = self.pieces[rook_id];
            self.toggle_piece_key(&rook, rook_to);
            self.toggle_piece_key(&rook, rook_from);
            self.set_square(rook_to, None);
            self.set_square(rook_from, Some(rook_id));
            self.pieces[rook_id].square = rook_from;
            self.pieces[rook_id].move_count = rook.move_count.saturating_sub(1);
        } else if mover.kind == PieceKind::Pawn && mv.from.abs_diff(mv.to) == 16 {
            self.pieces[mover_id].double_push_ply = None;
        }

        if let Some(captured_id) = mv.captured {
            let captured = self.pieces[captured_id];
            self.pieces[captured_id].captured = false;
            self.material_balance += self.side_sign(captured.color) * captured.kind.value();
            self.toggle_piece_key(&captured, captured.square);
            self.set_square(captured.square, Some(captured_id));
        }

        self.ply = previous_ply;
        self.side_to_move = self.side_to_move.opposite();
        self.zobrist_key ^= state_key(self);
        Ok(())
    }

    /// Apply `mv` and hand back a guard that undoes it when dropped.
    pub fn apply_scoped(&mut self, mv: Move) -> EngineResult<AppliedMove<'_>> {
        self.apply_move(&mv)?;
        Ok(AppliedMove::new(self, mv))
    }
}
