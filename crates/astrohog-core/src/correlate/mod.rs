pub mod cube;
pub mod frame;

pub use cube::{correlate_cube_and_vector, correlate_cubes, CubeCorrelation, CubeVectorCorrelation};
pub use frame::{
    correlate_frame_and_vector, correlate_frames, fold_orientation, relative_angles,
    FrameCorrelation,
};
