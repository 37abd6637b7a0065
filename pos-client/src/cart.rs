//! Order composition state
//!
//! The cart is the ordered list of lines shown on the ticket. Lines hydrated
//! from the server (committed) come first and are read-only; pending lines
//! are what the next send will transmit.

use crate::modifier::ItemWithModifiers;
use crate::{ClientError, ClientResult};
use shared::OrderTotals;
use shared::models::OrderLine;
use shared::money::calculate_totals;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<OrderLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cart seeded with the server's lines for an existing order
    pub fn hydrated(lines: Vec<OrderLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn pending_lines(&self) -> impl Iterator<Item = &OrderLine> {
        self.lines.iter().filter(|l| l.is_pending())
    }

    pub fn has_pending(&self) -> bool {
        self.lines.iter().any(OrderLine::is_pending)
    }

    fn pending_mut(&mut self, index: usize) -> ClientResult<&mut OrderLine> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or(ClientError::NoSuchLine(index))?;
        if !line.is_pending() {
            return Err(ClientError::LineCommitted(index));
        }
        Ok(line)
    }

    /// Add a confirmed item, merging into an identical pending line
    ///
    /// Returns the index of the affected line.
    pub fn confirm_item(&mut self, item: &ItemWithModifiers) -> ClientResult<usize> {
        let existing = self
            .lines
            .iter()
            .position(|l| l.is_pending() && l.same_composition(&item.item.id, &item.modifiers));

        match existing {
            Some(index) => {
                let line = &mut self.lines[index];
                line.quantity = checked_quantity(line, 1)?;
                line.recompute_total();
                Ok(index)
            }
            None => {
                self.lines.push(OrderLine::pending(
                    item.item.id.clone(),
                    item.item.name.clone(),
                    item.item.price,
                    item.modifiers.clone(),
                ));
                Ok(self.lines.len() - 1)
            }
        }
    }

    /// Add `delta` to the quantity; a result ≤ 0 removes the line
    pub fn update_quantity(&mut self, index: usize, delta: i32) -> ClientResult<()> {
        let line = self.pending_mut(index)?;
        line.quantity = checked_quantity(line, delta)?;
        if line.quantity <= 0 {
            self.lines.remove(index);
        } else {
            line.recompute_total();
        }
        Ok(())
    }

    pub fn remove_item(&mut self, index: usize) -> ClientResult<OrderLine> {
        self.pending_mut(index)?;
        Ok(self.lines.remove(index))
    }

    pub fn assign_seat(&mut self, index: usize, seat: u32) -> ClientResult<()> {
        if seat == 0 {
            return Err(ClientError::Validation("Seat numbers start at 1".into()));
        }
        self.pending_mut(index)?.seat = seat;
        Ok(())
    }

    pub fn assign_course(&mut self, index: usize, course: u32) -> ClientResult<()> {
        if course == 0 {
            return Err(ClientError::Validation("Course numbers start at 1".into()));
        }
        self.pending_mut(index)?.course = course;
        Ok(())
    }

    /// Set or clear (`None` / blank) the kitchen note
    pub fn set_notes(&mut self, index: usize, notes: Option<String>) -> ClientResult<()> {
        self.pending_mut(index)?.notes = notes.filter(|n| !n.trim().is_empty());
        Ok(())
    }

    /// Subtotal, 18% tax and total over every line
    pub fn totals(&self) -> OrderTotals {
        calculate_totals(&self.lines)
    }

    /// Drop pending lines, keeping committed ones
    pub fn clear_pending(&mut self) {
        self.lines.retain(|l| !l.is_pending());
    }

    /// Replace everything with the server's authoritative lines
    pub fn replace_lines(&mut self, lines: Vec<OrderLine>) {
        self.lines = lines;
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

fn checked_quantity(line: &OrderLine, delta: i32) -> ClientResult<i32> {
    line.quantity
        .checked_add(delta)
        .ok_or_else(|| ClientError::Validation(format!("Quantity of {} is out of range", line.name)))
}
