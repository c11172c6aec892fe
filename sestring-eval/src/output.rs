//! Output builder with style stacks, and the pool evaluations rent it from.
use enum_map::{Enum, EnumMap};
use parking_lot::Mutex;
use sestring::{
    Checkpoint, LinkKind, MacroCode, MacroPayload, Payload, SeString, SeStringBuilder,
    expr::Expression,
};
use smallvec::SmallVec;

/// The five LIFO style stacks of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum StyleStack {
    Color,
    EdgeColor,
    ShadowColor,
    Bold,
    Italic,
}

impl StyleStack {
    fn code(self) -> MacroCode {
        match self {
            StyleStack::Color => MacroCode::Color,
            StyleStack::EdgeColor => MacroCode::EdgeColor,
            StyleStack::ShadowColor => MacroCode::ShadowColor,
            StyleStack::Bold => MacroCode::Bold,
            StyleStack::Italic => MacroCode::Italic,
        }
    }

    /// Argument emitted when the stack is popped.
    fn pop_argument(self) -> Expression {
        match self {
            StyleStack::Color | StyleStack::EdgeColor | StyleStack::ShadowColor => {
                Expression::stack_color()
            }
            StyleStack::Bold | StyleStack::Italic => Expression::int(0),
        }
    }
}

type Stacks = EnumMap<StyleStack, SmallVec<[u32; 4]>>;

/// Rollback point of an [`OutputBuilder`].
#[derive(Debug, Clone)]
pub struct OutputCheckpoint {
    builder: Checkpoint,
    stacks: Stacks,
}

/// Accumulates the output of one evaluation.
#[derive(Debug, Clone, Default)]
pub struct OutputBuilder {
    builder: SeStringBuilder,
    stacks: Stacks,
}

impl OutputBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_text(&mut self, text: &str) -> &mut Self {
        self.builder.append_text(text);
        self
    }

    pub fn append_payload(&mut self, payload: Payload) -> &mut Self {
        self.builder.append_payload(payload);
        self
    }

    pub fn append_macro_payload(&mut self, payload: MacroPayload) -> &mut Self {
        self.builder.append_macro_payload(payload);
        self
    }

    pub fn append_macro(&mut self, code: MacroCode, args: impl IntoIterator<Item = Expression>) -> &mut Self {
        self.builder.append_macro(code, args);
        self
    }

    pub fn append(&mut self, string: &SeString) -> &mut Self {
        self.builder.append(string);
        self
    }

    /// Push `value` and emit the matching macro.
    pub fn push_style(&mut self, stack: StyleStack, value: u32) -> &mut Self {
        self.stacks[stack].push(value);
        self.builder.append_macro(stack.code(), [Expression::int(value)]);
        self
    }

    /// Pop the stack and emit the matching pop macro. Popping an empty stack
    /// still emits it, leaving the renderer to restore its default.
    pub fn pop_style(&mut self, stack: StyleStack) -> &mut Self {
        self.stacks[stack].pop();
        self.builder.append_macro(stack.code(), [stack.pop_argument()]);
        self
    }

    /// Values currently pushed on `stack`, oldest first.
    pub fn style(&self, stack: StyleStack) -> &[u32] {
        &self.stacks[stack]
    }

    /// Open a hyperlink of `kind`.
    pub fn push_link(&mut self, kind: LinkKind, args: impl IntoIterator<Item = Expression>) -> &mut Self {
        let args = std::iter::once(Expression::int(kind as u32)).chain(args);
        self.builder.append_macro(MacroCode::Link, args);
        self
    }

    /// Close the current hyperlink.
    pub fn pop_link(&mut self) -> &mut Self {
        self.push_link(LinkKind::Terminator, [])
    }

    /// Emit an unresolved `colortype`, left for the renderer.
    pub fn push_color_type(&mut self, color_type: u32) -> &mut Self {
        self.builder.append_macro(MacroCode::ColorType, [Expression::int(color_type)]);
        self
    }

    pub fn pop_color_type(&mut self) -> &mut Self {
        self.push_color_type(0)
    }

    pub fn push_edge_color_type(&mut self, color_type: u32) -> &mut Self {
        self.builder
            .append_macro(MacroCode::EdgeColorType, [Expression::int(color_type)]);
        self
    }

    pub fn pop_edge_color_type(&mut self) -> &mut Self {
        self.push_edge_color_type(0)
    }

    pub fn checkpoint(&self) -> OutputCheckpoint {
        OutputCheckpoint {
            builder: self.builder.checkpoint(),
            stacks: self.stacks.clone(),
        }
    }

    pub fn rollback(&mut self, checkpoint: OutputCheckpoint) {
        self.builder.rollback(checkpoint.builder);
        self.stacks = checkpoint.stacks;
    }

    pub fn is_empty(&self) -> bool {
        self.builder.is_empty()
    }

    /// Move the output out and reset the stacks.
    pub fn finish(&mut self) -> SeString {
        self.stacks.values_mut().for_each(SmallVec::clear);
        self.builder.take()
    }

    pub fn clear(&mut self) {
        self.builder.clear();
        self.stacks.values_mut().for_each(SmallVec::clear);
    }
}

/// Free list of cleared builders.
#[derive(Debug)]
pub struct BuilderPool {
    free: Mutex<Vec<OutputBuilder>>,
    capacity: usize,
}

impl BuilderPool {
    /// Pool keeping at most `capacity` idle builders.
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    /// Rent a cleared builder. It returns to the pool when the guard drops.
    pub fn rent(&self) -> PooledBuilder<'_> {
        let builder = self.free.lock().pop().unwrap_or_default();
        PooledBuilder {
            pool: self,
            builder,
        }
    }

    /// Number of idle builders.
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }

    fn give_back(&self, mut builder: OutputBuilder) {
        builder.clear();
        let mut free = self.free.lock();
        if free.len() < self.capacity {
            free.push(builder);
        }
    }
}

/// Exclusive handle on a rented builder.
pub struct PooledBuilder<'a> {
    pool: &'a BuilderPool,
    builder: OutputBuilder,
}

impl std::ops::Deref for PooledBuilder<'_> {
    type Target = OutputBuilder;

    fn deref(&self) -> &Self::Target {
        &self.builder
    }
}

impl std::ops::DerefMut for PooledBuilder<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.builder
    }
}

impl Drop for PooledBuilder<'_> {
    fn drop(&mut self) {
        self.pool.give_back(std::mem::take(&mut self.builder));
    }
}
