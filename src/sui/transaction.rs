//! Unsigned programmable transactions.
//!
//! A transaction is assembled against object ids only. Versions, digests and
//! shared-object metadata are filled in by the chain client right before
//! signing, see [`UnsignedTransaction::resolve`]. Commands are the SDK's own
//! types, so only the inputs need resolving.

use std::collections::HashMap;

use eyre::{eyre, Result};
use serde::Serialize;

use super::{
    Argument, Command, Identifier, Input, MoveCall, ObjectId, ObjectReference,
    ProgrammableTransaction, SplitCoins, TypeTag,
};

/// A transaction input before resolution
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxInput {
    /// BCS bytes of a plain value
    Pure(Vec<u8>),
    /// An object; `mutable` only matters if it turns out to be shared
    Object {
        /// Object id
        id: ObjectId,
        /// Whether the call takes it by `&mut`
        mutable: bool,
    },
}

/// Chain state needed to reference an object input
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedObject {
    /// Current (id, version, digest)
    pub reference: ObjectReference,
    /// Set when the object is shared
    pub initial_shared_version: Option<u64>,
}

/// A built transaction, not yet bound to a sender, gas payment or signature
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsignedTransaction {
    /// Inputs in index order
    pub inputs: Vec<TxInput>,
    /// Commands in execution order
    pub commands: Vec<Command>,
    /// Gas budget in MIST
    pub gas_budget: u64,
}

impl UnsignedTransaction {
    /// Ids of all object inputs, in input order
    #[must_use]
    pub fn object_ids(&self) -> Vec<ObjectId> {
        self.inputs
            .iter()
            .filter_map(|input| match input {
                TxInput::Object { id, .. } => Some(*id),
                TxInput::Pure(_) => None,
            })
            .collect()
    }

    /// The first Move call, if any
    #[must_use]
    pub fn move_call(&self) -> Option<&MoveCall> {
        self.commands.iter().find_map(|command| match command {
            Command::MoveCall(call) => Some(call),
            _ => None,
        })
    }

    /// Decodes a pure `u64` input referenced by `argument`.
    #[must_use]
    pub fn pure_u64(&self, argument: Argument) -> Option<u64> {
        let Argument::Input(index) = argument else {
            return None;
        };
        match self.inputs.get(usize::from(index))? {
            TxInput::Pure(bytes) => bcs::from_bytes(bytes).ok(),
            TxInput::Object { .. } => None,
        }
    }

    /// Binds object inputs to the given chain state.
    ///
    /// # Errors
    /// * If an object input is missing from `objects`
    pub fn resolve(
        &self,
        objects: &HashMap<ObjectId, ResolvedObject>,
    ) -> Result<ProgrammableTransaction> {
        let inputs = self
            .inputs
            .iter()
            .map(|input| match input {
                TxInput::Pure(bytes) => Ok(Input::Pure {
                    value: bytes.clone(),
                }),
                TxInput::Object { id, mutable } => {
                    let object = objects
                        .get(id)
                        .ok_or_else(|| eyre!("Object {id} was not resolved"))?;
                    Ok(match object.initial_shared_version {
                        Some(initial_shared_version) => Input::Shared {
                            object_id: *id,
                            initial_shared_version,
                            mutable: *mutable,
                        },
                        None => Input::ImmutableOrOwned(object.reference.clone()),
                    })
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ProgrammableTransaction {
            inputs,
            commands: self.commands.clone(),
        })
    }
}

/// Accumulates inputs and commands for an [`UnsignedTransaction`].
#[derive(Debug, Default)]
pub struct TransactionBuilder {
    /// Inputs added so far
    inputs: Vec<TxInput>,
    /// Commands added so far
    commands: Vec<Command>,
}

impl TransactionBuilder {
    /// Empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a BCS-encoded value input.
    ///
    /// # Errors
    /// * If the value cannot be BCS-encoded
    pub fn pure<T: Serialize>(&mut self, value: &T) -> Result<Argument> {
        let bytes = bcs::to_bytes(value).map_err(|e| eyre!("Failed to encode input: {e}"))?;
        Ok(self.push_input(TxInput::Pure(bytes)))
    }

    /// Adds an object input.
    pub fn object(&mut self, id: ObjectId, mutable: bool) -> Argument {
        self.push_input(TxInput::Object { id, mutable })
    }

    /// Splits `amount` off `coin`, returning the new coin.
    pub fn split_coin(&mut self, coin: Argument, amount: Argument) -> Argument {
        let index = self.push_command(Command::SplitCoins(SplitCoins {
            coin,
            amounts: vec![amount],
        }));
        Argument::NestedResult(index, 0)
    }

    /// Calls `package::module::function<type_arguments>(arguments)`.
    ///
    /// # Errors
    /// * If `module` or `function` is not a valid Move identifier
    pub fn move_call(
        &mut self,
        package: ObjectId,
        module: &str,
        function: &str,
        type_arguments: Vec<TypeTag>,
        arguments: Vec<Argument>,
    ) -> Result<Argument> {
        let index = self.push_command(Command::MoveCall(MoveCall {
            package,
            module: identifier(module)?,
            function: identifier(function)?,
            type_arguments,
            arguments,
        }));
        Ok(Argument::Result(index))
    }

    /// Finishes the transaction with a fixed gas budget.
    #[must_use]
    pub fn finish(self, gas_budget: u64) -> UnsignedTransaction {
        UnsignedTransaction {
            inputs: self.inputs,
            commands: self.commands,
            gas_budget,
        }
    }

    /// Appends an input and returns its argument
    #[allow(clippy::cast_possible_truncation)]
    fn push_input(&mut self, input: TxInput) -> Argument {
        self.inputs.push(input);
        Argument::Input((self.inputs.len() - 1) as u16)
    }

    /// Appends a command and returns its index
    #[allow(clippy::cast_possible_truncation)]
    fn push_command(&mut self, command: Command) -> u16 {
        self.commands.push(command);
        (self.commands.len() - 1) as u16
    }
}

/// Validates a Move module or function name
fn identifier(name: &str) -> Result<Identifier> {
    Identifier::new(name).map_err(|e| eyre!("Invalid Move identifier {name:?}: {e}"))
}
