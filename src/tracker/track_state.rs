/// Identity tracking lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Feature cloud is being followed frame to frame
    #[default]
    Tracking,
    /// Too few features survived; waiting for re-detection
    Lost,
}
