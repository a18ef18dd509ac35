fn main() {
    harbinger::run();
}
