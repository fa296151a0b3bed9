fn main() -> std::process::ExitCode {
    project_puller::run()
}
