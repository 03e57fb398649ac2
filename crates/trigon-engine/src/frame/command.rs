use std::ops::Range;

/// One recorded step of a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    BeginPass { clear: wgpu::Color },
    SetPipeline,
    SetVertexBuffer { slot: u32 },
    Draw { vertices: Range<u32>, instances: Range<u32> },
    EndPass,
    Submit,
}

/// Ordered commands for one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandSequence {
    commands: Vec<Command>,
}

impl CommandSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// `(vertices, instances)` of every draw, in order.
    pub fn draws(&self) -> impl Iterator<Item = (&Range<u32>, &Range<u32>)> {
        self.commands.iter().filter_map(|c| match c {
            Command::Draw {
                vertices,
                instances,
            } => Some((vertices, instances)),
            _ => None,
        })
    }

    /// Clear color of the first pass, if any.
    pub fn clear_color(&self) -> Option<wgpu::Color> {
        self.commands.iter().find_map(|c| match c {
            Command::BeginPass { clear } => Some(*clear),
            _ => None,
        })
    }
}

impl<'a> IntoIterator for &'a CommandSequence {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
