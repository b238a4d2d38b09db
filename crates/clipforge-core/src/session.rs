use crate::error::{ClipforgeError, Result};
use crate::operation::{Operation, ParamValue};
use crate::registry::Registry;

/// Operation name recorded by the manual-edit action. The edited result is
/// captured as the single parameter, so replay never reopens an editor.
pub const OP_MANUAL_EDIT: &str = "manual-edit";

/// Operation name recorded by the jq action. The filter is the parameter;
/// replay re-runs the binary (deterministic for fixed input and filter).
pub const OP_JQ: &str = "jq";

// ---------------------------------------------------------------------------
// ApplyOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// The transform produced an identical or blank result; nothing was
    /// recorded.
    NoChange,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One pipeline run: the captured input, the current running value, and the
/// ordered operations that produced it. Step-back and replay always rebuild
/// the running value from the original input, never mutate in place, so any
/// prefix of the operation list is a valid resume point.
#[derive(Debug, Clone)]
pub struct Session {
    input: String,
    running_value: String,
    operations: Vec<Operation>,
    jq_bin: Option<String>,
}

impl Session {
    pub fn new(input: impl Into<String>) -> Self {
        let input = input.into();
        Self {
            running_value: input.clone(),
            input,
            operations: Vec::new(),
            jq_bin: None,
        }
    }

    /// Explicit jq path from config; PATH lookup otherwise.
    pub fn with_jq_bin(mut self, jq_bin: Option<String>) -> Self {
        self.jq_bin = jq_bin;
        self
    }

    /// Start a session and replay `operations` in order against the input.
    pub fn start(
        input: impl Into<String>,
        operations: &[Operation],
        registry: Registry,
    ) -> Result<Self> {
        let mut session = Self::new(input);
        session.replace(registry, operations.to_vec())?;
        Ok(session)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn value(&self) -> &str {
        &self.running_value
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Evaluate one operation against a value without recording anything.
    pub fn evaluate(
        &self,
        registry: Registry,
        value: &str,
        operation: &Operation,
    ) -> Result<String> {
        if let Some(descriptor) = registry.get(&operation.name) {
            return Ok((descriptor.apply)(value, &operation.params));
        }
        match operation.name.as_str() {
            // Side-effecting operations captured at record time.
            OP_MANUAL_EDIT => Ok(operation
                .params
                .first()
                .map(ParamValue::as_text)
                .unwrap_or_else(|| value.to_string())),
            OP_JQ => {
                let filter = operation
                    .params
                    .first()
                    .map(ParamValue::as_text)
                    .unwrap_or_default();
                crate::external::run_jq(value, &filter, self.jq_bin.as_deref())
            }
            _ => Err(ClipforgeError::TransformNotFound(operation.name.clone())),
        }
    }

    /// Apply an operation to the running value. Identical or blank results
    /// are discarded and reported as `NoChange`; otherwise the operation is
    /// recorded.
    pub fn apply(&mut self, registry: Registry, operation: Operation) -> Result<ApplyOutcome> {
        let result = self.evaluate(registry, &self.running_value, &operation)?;
        if result == self.running_value || result.trim().is_empty() {
            return Ok(ApplyOutcome::NoChange);
        }
        self.running_value = result;
        self.operations.push(operation);
        Ok(ApplyOutcome::Applied)
    }

    /// Remove the most recent operation and rebuild the running value by
    /// replaying the remaining prefix. Returns false when there is nothing
    /// to undo.
    pub fn step_back(&mut self, registry: Registry) -> Result<bool> {
        if self.operations.is_empty() {
            return Ok(false);
        }
        let mut remaining = self.operations.clone();
        remaining.pop();
        self.replace(registry, remaining)?;
        Ok(true)
    }

    /// Reset to the captured input with an empty operation list.
    pub fn reset(&mut self) {
        self.running_value = self.input.clone();
        self.operations.clear();
    }

    /// Wholesale-replace the operation list, replaying it in order against
    /// the original input (the last/preset replay semantics). Operations are
    /// kept verbatim even when an individual step happens to be a no-op.
    pub fn replace(&mut self, registry: Registry, operations: Vec<Operation>) -> Result<()> {
        let mut value = self.input.clone();
        for op in &operations {
            value = self.evaluate(registry, &value, op)?;
        }
        self.running_value = value;
        self.operations = operations;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
