use super::{Cents, Direction, Status, Transaction};

/// Sum of active principals in one direction. Settled transactions no
/// longer count toward exposure, so they are excluded here.
pub fn outstanding_principal(transactions: &[Transaction], direction: Direction) -> Cents {
    transactions
        .iter()
        .filter(|tx| tx.direction == direction && tx.status == Status::Active)
        .map(|tx| tx.principal_cents)
        .sum()
}

/// Net position: money lent out minus money borrowed, active records only.
/// Positive means the world owes you; negative means you owe the world.
pub fn net_balance(transactions: &[Transaction]) -> Cents {
    outstanding_principal(transactions, Direction::Given)
        - outstanding_principal(transactions, Direction::Taken)
}
