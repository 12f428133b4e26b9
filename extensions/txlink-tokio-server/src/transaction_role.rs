/// Which side of the transaction protocol a registered connection speaks.
///
/// Transaction managers open and close global transactions; resource
/// managers own branches and receive commit/rollback orders. A connection
/// gets its role from the register frame it identifies with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TransactionRole {
    Tm,
    Rm,
}
