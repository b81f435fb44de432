use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Phase {
    Assembling, // Writing the image folder into the video file
    Playing,    // Showing the video frame by frame
    Waiting,    // Post-playback pause before exit
    Done,
}

impl Phase {
    /// Phases run once each, in order, with no way back.
    pub fn next(self) -> Self {
        match self {
            Phase::Assembling => Phase::Playing,
            Phase::Playing => Phase::Waiting,
            Phase::Waiting | Phase::Done => Phase::Done,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Assembling => "assembling",
            Phase::Playing => "playing",
            Phase::Waiting => "waiting",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}
