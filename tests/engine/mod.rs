mod camera;
mod measurement;
mod pose;
