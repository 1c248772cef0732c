mod ensure;
