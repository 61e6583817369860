use opencv::core;

pub const LANDMARKS_LEN: usize = 68;

// 68-point layout: 36..42 right eye, 42..48 left eye
const RIGHT_EYE_START: usize = 36;
const LEFT_EYE_START: usize = 42;
const EYE_POINTS_LEN: usize = 6;

// horizontal spans under this count as degenerate geometry
const MIN_EYE_SPAN: f32 = 1e-3;

/// One detected face as 68 fixed-index points in frame pixel coordinates.
#[derive(Debug, Clone)]
pub struct Landmarks(pub [[f32; 2]; LANDMARKS_LEN]);

impl Landmarks {
    pub fn left_eye(&self) -> EyeRegion {
        EyeRegion(std::array::from_fn(|idx| self.0[LEFT_EYE_START + idx]))
    }

    pub fn right_eye(&self) -> EyeRegion {
        EyeRegion(std::array::from_fn(|idx| self.0[RIGHT_EYE_START + idx]))
    }
}

impl TryFrom<Vec<[f32; 2]>> for Landmarks {
    type Error = crate::Error;

    fn try_from(points: Vec<[f32; 2]>) -> crate::Result<Self> {
        let len = points.len();
        let points: [[f32; 2]; LANDMARKS_LEN] = points.try_into().map_err(|_| {
            crate::Error::InvalidModelIOError(format!(
                "expected {} landmarks, got {}",
                LANDMARKS_LEN, len
            ))
        })?;
        Ok(Self(points))
    }
}

impl std::ops::Deref for Landmarks {
    type Target = [[f32; 2]; LANDMARKS_LEN];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for Landmarks {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Six eye landmarks ordered corner, top pair, corner, bottom pair.
#[derive(Debug, Clone)]
pub struct EyeRegion(pub [[f32; 2]; EYE_POINTS_LEN]);

impl EyeRegion {
    /// Eye aspect ratio: (|p1-p5| + |p2-p4|) / (2 * |p0-p3|). `None` when the
    /// eye collapses horizontally.
    pub fn aspect_ratio(&self) -> Option<f32> {
        let horizontal = distance(self.0[0], self.0[3]);
        if horizontal < MIN_EYE_SPAN {
            return None;
        }
        Some((distance(self.0[1], self.0[5]) + distance(self.0[2], self.0[4])) / (2. * horizontal))
    }

    /// Integer bounding box of the region; callers clip it to the frame.
    pub fn bounding_box(&self) -> core::Rect {
        let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
        let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
        for [x, y] in self.0 {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        core::Rect::new(
            min_x.floor() as i32,
            min_y.floor() as i32,
            (max_x - min_x).ceil() as i32,
            (max_y - min_y).ceil() as i32,
        )
    }
}

impl std::ops::Deref for EyeRegion {
    type Target = [[f32; 2]; EYE_POINTS_LEN];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    (a[0] - b[0]).hypot(a[1] - b[1])
}

#[cfg(test)]
mod test {
    use super::{EyeRegion, Landmarks, LANDMARKS_LEN};

    fn open_eye() -> EyeRegion {
        EyeRegion([
            [0., 2.],
            [1., 1.],
            [3., 1.],
            [4., 2.],
            [3., 3.],
            [1., 3.],
        ])
    }

    #[test]
    fn aspect_ratio_is_finite_and_non_negative() {
        let ratio = open_eye().aspect_ratio().expect("Eye should not degenerate");
        assert!(ratio.is_finite());
        assert!(ratio >= 0.);
        assert_eq!(ratio, 0.5);
    }

    #[test]
    fn aspect_ratio_is_invariant_under_translation() {
        let eye = open_eye();
        let shifted = EyeRegion(eye.0.map(|[x, y]| [x + 137.5, y - 42.25]));
        assert!((eye.aspect_ratio().unwrap() - shifted.aspect_ratio().unwrap()).abs() < 1e-5);
    }

    #[test]
    fn zero_width_eye_has_no_ratio() {
        let collapsed = EyeRegion([[5., 5.]; 6]);
        assert!(collapsed.aspect_ratio().is_none());
    }

    #[test]
    fn rejects_anything_but_68_points() {
        assert!(Landmarks::try_from(vec![[0.; 2]; 67]).is_err());
        assert!(Landmarks::try_from(vec![[0.; 2]; 69]).is_err());
        assert!(Landmarks::try_from(vec![[0.; 2]; LANDMARKS_LEN]).is_ok());
    }

    #[test]
    fn eye_regions_come_from_the_fixed_indices() {
        let mut points = [[0.; 2]; LANDMARKS_LEN];
        for (idx, point) in points.iter_mut().enumerate() {
            point[0] = idx as f32;
        }
        let landmarks = Landmarks(points);

        assert_eq!(landmarks.right_eye().0[0][0], 36.);
        assert_eq!(landmarks.right_eye().0[5][0], 41.);
        assert_eq!(landmarks.left_eye().0[0][0], 42.);
        assert_eq!(landmarks.left_eye().0[5][0], 47.);
    }

    #[test]
    fn bounding_box_spans_the_region() {
        let rect = open_eye().bounding_box();
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (0, 1, 4, 2));
    }
}
