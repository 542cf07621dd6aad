fn main() {
    zune_hdre_bin::main()
}
