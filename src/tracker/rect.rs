/// Axis-aligned face bounding box in frame pixel coordinates.
///
/// Stored as TLWH: top-left x, top-left y, width, height.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Get the top-left corner.
    #[inline]
    pub fn top_left(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Get the center point of the bounding box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Get the area of the bounding box.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Area shared with another box, zero when they do not overlap.
    pub fn intersection_area(&self, other: &Rect) -> f32 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        let inter_width = (x2 - x1).max(0.0);
        let inter_height = (y2 - y1).max(0.0);
        inter_width * inter_height
    }

    /// Clamp into a `frame_width` x `frame_height` frame.
    ///
    /// The origin is clamped into `[0, frame_width] x [0, frame_height]`
    /// first, then the size is shrunk so the box ends inside the frame when
    /// measured from that origin.
    pub fn clamp_to(&self, frame_width: f32, frame_height: f32) -> Rect {
        let x = self.x.clamp(0.0, frame_width.max(0.0));
        let y = self.y.clamp(0.0, frame_height.max(0.0));
        let width = self.width.min(frame_width - x).max(0.0);
        let height = self.height.min(frame_height - y).max(0.0);
        Rect::new(x, y, width, height)
    }

    /// Integer pixel window `(x0, y0, x1, y1)` covered by the box, clipped
    /// to the frame. `x1`/`y1` are exclusive and never below `x0`/`y0`.
    pub fn pixel_window(
        &self,
        frame_width: usize,
        frame_height: usize,
    ) -> (usize, usize, usize, usize) {
        let clip = |v: f32, max: usize| -> usize {
            if v.is_nan() || v <= 0.0 {
                0
            } else {
                (v as usize).min(max)
            }
        };
        let [x1, y1, x2, y2] = self.to_tlbr();
        let x0 = clip(x1.floor(), frame_width);
        let y0 = clip(y1.floor(), frame_height);
        let x1 = clip(x2.ceil(), frame_width).max(x0);
        let y1 = clip(y2.ceil(), frame_height).max(y0);
        (x0, y0, x1, y1)
    }
}
