pub mod local_fs;
