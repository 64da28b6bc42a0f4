pub(crate) mod paint;
pub(crate) mod pipeline;
pub(crate) mod qr;
pub(crate) mod surface;
pub(crate) mod text;
