mod moralis;
